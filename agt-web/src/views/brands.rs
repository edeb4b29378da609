//! Brand pages

use agt_common::{Brand, Equipment};
use axum::response::Html;

use super::{escape, page, text_input, validation_summary, FormMode};
use crate::forms::{BrandForm, ValidationErrors};

pub fn index(brands: &[Brand], search: Option<&str>) -> Html<String> {
    let rows: String = brands
        .iter()
        .map(|b| {
            format!(
                r#"            <tr>
                <td>{name}</td>
                <td>{country}</td>
                <td>
                    <a href="/Brands/Edit/{id}">Edit</a> |
                    <a href="/Brands/Details/{id}">Details</a> |
                    <a href="/Brands/Delete/{id}">Delete</a>
                </td>
            </tr>
"#,
                id = b.id,
                name = escape(&b.name),
                country = escape(&b.country),
            )
        })
        .collect();

    let body = format!(
        r#"        <p><a href="/Brands/Create">Create New</a></p>
        <form method="get" action="/Brands">
            <input type="search" name="searchString" value="{search}" placeholder="Name or country">
            <button type="submit">Search</button>
        </form>
        <table>
            <thead><tr><th>Name</th><th>Country</th><th></th></tr></thead>
            <tbody>
{rows}            </tbody>
        </table>"#,
        search = escape(search.unwrap_or_default()),
        rows = rows,
    );

    page("Brands", &body)
}

pub fn details(brand: &Brand, equipment: &[Equipment]) -> Html<String> {
    let owned = if equipment.is_empty() {
        "        <p>No equipment from this brand yet.</p>\n".to_string()
    } else {
        let items: String = equipment
            .iter()
            .map(|e| {
                format!(
                    r#"            <li><a href="/Equipments/Details/{}">{}</a> ({})</li>
"#,
                    e.id,
                    escape(&e.model_name),
                    e.kind
                )
            })
            .collect();
        format!("        <ul>\n{}        </ul>\n", items)
    };

    let body = format!(
        r#"        <dl>
            <dt>Name</dt><dd>{name}</dd>
            <dt>Country</dt><dd>{country}</dd>
        </dl>
        <h2>Equipment</h2>
{owned}        <p><a href="/Brands/Edit/{id}">Edit</a> | <a href="/Brands">Back to List</a></p>"#,
        id = brand.id,
        name = escape(&brand.name),
        country = escape(&brand.country),
        owned = owned,
    );

    page(&brand.name, &body)
}

pub fn form(mode: FormMode, values: &BrandForm, errors: &ValidationErrors) -> Html<String> {
    let hidden_id = match mode {
        FormMode::Create => String::new(),
        FormMode::Edit(id) => format!(r#"            <input type="hidden" name="Id" value="{}">
"#, id),
    };

    let body = format!(
        r#"        {summary}
        <form method="post" action="{action}">
{hidden_id}{name}{country}            <button type="submit">Save</button>
        </form>
        <p><a href="/Brands">Back to List</a></p>"#,
        summary = validation_summary(errors),
        action = mode.action("Brands"),
        hidden_id = hidden_id,
        name = text_input("Name", "Name", &values.name, "text", errors),
        country = text_input("Country", "Country", &values.country, "text", errors),
    );

    page(&format!("{} Brand", mode.verb()), &body)
}

pub fn delete_confirm(brand: &Brand, equipment_count: usize) -> Html<String> {
    let body = format!(
        r#"        <h3>Are you sure you want to delete this brand?</h3>
        <dl>
            <dt>Name</dt><dd>{name}</dd>
            <dt>Country</dt><dd>{country}</dd>
        </dl>
        <p>Deleting it also removes {count} equipment item(s).</p>
        <form method="post" action="/Brands/Delete/{id}">
            <button type="submit">Delete</button> | <a href="/Brands">Back to List</a>
        </form>"#,
        id = brand.id,
        name = escape(&brand.name),
        country = escape(&brand.country),
        count = equipment_count,
    );

    page("Delete Brand", &body)
}
