//! Equipment pages

use agt_common::{Brand, Equipment, EquipmentType};
use axum::response::Html;

use super::{escape, field_error, page, text_input, validation_summary, FormMode};
use crate::forms::{EquipmentForm, ValidationErrors};

/// Quick-search dropdown fed by `/Equipments/SearchJson`
const QUICK_SEARCH_JS: &str = r#"
        <script>
        (function () {
            const box = document.getElementById('quick-search');
            const list = document.getElementById('quick-search-results');
            let pending = null;
            box.addEventListener('input', function () {
                clearTimeout(pending);
                pending = setTimeout(async function () {
                    const term = box.value.trim();
                    list.innerHTML = '';
                    if (!term) return;
                    const response = await fetch('/Equipments/SearchJson?term=' + encodeURIComponent(term));
                    const items = await response.json();
                    for (const item of items) {
                        const li = document.createElement('li');
                        const a = document.createElement('a');
                        a.href = item.url;
                        a.textContent = item.title;
                        const small = document.createElement('small');
                        small.textContent = item.subtitle;
                        a.appendChild(small);
                        li.appendChild(a);
                        list.appendChild(li);
                    }
                }, 150);
            });
        })();
        </script>"#;

fn format_date(e: &Equipment) -> String {
    e.purchase_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn index(items: &[Equipment], search: Option<&str>) -> Html<String> {
    let rows: String = items
        .iter()
        .map(|e| {
            format!(
                r#"            <tr>
                <td>{model}</td>
                <td>{brand}</td>
                <td>{kind}</td>
                <td>{price}</td>
                <td>{date}</td>
                <td>{score}</td>
                <td>
                    <a href="/Equipments/Edit/{id}">Edit</a> |
                    <a href="/Equipments/Details/{id}">Details</a> |
                    <a href="/Equipments/Delete/{id}">Delete</a>
                </td>
            </tr>
"#,
                id = e.id,
                model = escape(&e.model_name),
                brand = escape(e.brand_name().unwrap_or_default()),
                kind = e.kind,
                price = e.price,
                date = format_date(e),
                score = e.review_score,
            )
        })
        .collect();

    let body = format!(
        r#"        <p><a href="/Equipments/Create">Create New</a></p>
        <input type="search" id="quick-search" placeholder="Quick search..." autocomplete="off">
        <ul id="quick-search-results" class="suggestions"></ul>
        <form method="get" action="/Equipments">
            <input type="search" name="searchString" value="{search}" placeholder="Model or brand">
            <button type="submit">Search</button>
            <a href="/Equipments">Back to Full List</a>
        </form>
        <table>
            <thead><tr><th>Model</th><th>Brand</th><th>Type</th><th>Price</th><th>Purchase Date</th><th>Review (1-10)</th><th></th></tr></thead>
            <tbody>
{rows}            </tbody>
        </table>{script}"#,
        search = escape(search.unwrap_or_default()),
        rows = rows,
        script = QUICK_SEARCH_JS,
    );

    page("Equipment", &body)
}

pub fn details(e: &Equipment) -> Html<String> {
    let brand = match &e.brand {
        Some(b) => format!(
            r#"<a href="/Brands/Details/{}">{}</a>"#,
            b.id,
            escape(&b.name)
        ),
        None => e.brand_id.to_string(),
    };

    let body = format!(
        r#"        <dl>
            <dt>Brand</dt><dd>{brand}</dd>
            <dt>Type</dt><dd>{kind}</dd>
            <dt>Price</dt><dd>{price}</dd>
            <dt>Purchase Date</dt><dd>{date}</dd>
            <dt>Review (1-10)</dt><dd>{score}</dd>
            <dt>Notes</dt><dd>{notes}</dd>
        </dl>
        <p><a href="/Equipments/Edit/{id}">Edit</a> | <a href="/Equipments">Back to List</a></p>"#,
        id = e.id,
        brand = brand,
        kind = e.kind,
        price = e.price,
        date = format_date(e),
        score = e.review_score,
        notes = escape(e.notes.as_deref().unwrap_or_default()),
    );

    page(&e.model_name, &body)
}

fn select(
    label: &str,
    name: &'static str,
    options: &[(String, String)],
    selected: &str,
    errors: &ValidationErrors,
) -> String {
    let options: String = options
        .iter()
        .map(|(value, text)| {
            let marker = if value == selected.trim() { " selected" } else { "" };
            format!(
                r#"                    <option value="{}"{}>{}</option>
"#,
                escape(value),
                marker,
                escape(text)
            )
        })
        .collect();

    format!(
        r#"            <p>
                <label for="{name}">{label}</label><br>
                <select id="{name}" name="{name}">
{options}                </select>
                {error}
            </p>
"#,
        label = label,
        name = name,
        options = options,
        error = field_error(errors, name),
    )
}

pub fn form(
    mode: FormMode,
    values: &EquipmentForm,
    errors: &ValidationErrors,
    brands: &[Brand],
) -> Html<String> {
    let hidden_id = match mode {
        FormMode::Create => String::new(),
        FormMode::Edit(id) => format!(r#"            <input type="hidden" name="Id" value="{}">
"#, id),
    };

    let type_options: Vec<(String, String)> = EquipmentType::ALL
        .iter()
        .map(|t| (t.as_i64().to_string(), t.to_string()))
        .collect();
    let brand_options: Vec<(String, String)> = brands
        .iter()
        .map(|b| (b.id.to_string(), b.name.clone()))
        .collect();

    // Accept either the number or the name when re-selecting the type
    let selected_type = values
        .kind
        .parse::<EquipmentType>()
        .map(|t| t.as_i64().to_string())
        .unwrap_or_default();

    let body = format!(
        r#"        {summary}
        <form method="post" action="{action}">
{hidden_id}{model}{kind}{price}{date}{score}            <p>
                <label for="Notes">Notes</label><br>
                <textarea id="Notes" name="Notes" rows="3" cols="40">{notes}</textarea>
            </p>
{brand}            <button type="submit">Save</button>
        </form>
        <p><a href="/Equipments">Back to List</a></p>"#,
        summary = validation_summary(errors),
        action = mode.action("Equipments"),
        hidden_id = hidden_id,
        model = text_input("Model", "ModelName", &values.model_name, "text", errors),
        kind = select("Type", "Type", &type_options, &selected_type, errors),
        price = text_input("Price", "Price", &values.price, "text", errors),
        date = text_input("Purchase Date", "PurchaseDate", &values.purchase_date, "date", errors),
        score = text_input("Review (1-10)", "ReviewScore", &values.review_score, "text", errors),
        notes = escape(&values.notes),
        brand = select("Brand", "BrandId", &brand_options, &values.brand_id, errors),
    );

    page(&format!("{} Equipment", mode.verb()), &body)
}

pub fn delete_confirm(e: &Equipment) -> Html<String> {
    let body = format!(
        r#"        <h3>Are you sure you want to delete this?</h3>
        <dl>
            <dt>Model</dt><dd>{model}</dd>
            <dt>Brand</dt><dd>{brand}</dd>
            <dt>Type</dt><dd>{kind}</dd>
        </dl>
        <form method="post" action="/Equipments/Delete/{id}">
            <button type="submit">Delete</button> | <a href="/Equipments">Back to List</a>
        </form>"#,
        id = e.id,
        model = escape(&e.model_name),
        brand = escape(e.brand_name().unwrap_or_default()),
        kind = e.kind,
    );

    page("Delete Equipment", &body)
}
