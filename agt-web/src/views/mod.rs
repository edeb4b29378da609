//! Server-rendered HTML pages
//!
//! Pages are plain `format!` templates around a shared layout. Every value
//! that came from the database or a form goes through [`escape`].

use axum::{http::StatusCode, response::Html};

use crate::forms::ValidationErrors;

pub mod brands;
pub mod equipments;

/// Whether a form creates a record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    fn action(self, controller: &str) -> String {
        match self {
            FormMode::Create => format!("/{}/Create", controller),
            FormMode::Edit(id) => format!("/{}/Edit/{}", controller, id),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            FormMode::Create => "Create",
            FormMode::Edit(_) => "Edit",
        }
    }
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared layout
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Audio Gear Tracker</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; color: #222; }}
        header {{ background: #2a2a2a; padding: 12px 20px; }}
        header a {{ color: #e0e0e0; margin-right: 16px; text-decoration: none; }}
        header a.brand {{ color: #4a9eff; font-weight: 600; }}
        main {{ padding: 20px; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border-bottom: 1px solid #ddd; padding: 6px 8px; text-align: left; }}
        .field-error, .validation-summary {{ color: #b00020; }}
        .suggestions {{ list-style: none; padding: 0; margin: 4px 0; max-width: 420px; }}
        .suggestions li a {{ display: block; padding: 4px 0; }}
        .suggestions small {{ color: #777; margin-left: 6px; }}
        footer {{ color: #888; font-size: 12px; padding: 10px 20px; font-family: 'Courier New', monospace; }}
    </style>
</head>
<body>
    <header>
        <a class="brand" href="/">Audio Gear Tracker</a>
        <a href="/Equipments">Equipment</a>
        <a href="/Brands">Brands</a>
    </header>
    <main>
        <h1>{title}</h1>
{body}
    </main>
    <footer>v{version} [{git_hash}]</footer>
</body>
</html>
"#,
        title = escape(title),
        body = body,
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
    ))
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    page(
        &format!("{} {}", status.as_u16(), title),
        &format!(
            r#"        <p>{}</p>
        <p><a href="/">Back to the catalog</a></p>"#,
            escape(message)
        ),
    )
}

/// Inline message for one form field, or nothing
fn field_error(errors: &ValidationErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|msg| format!(r#"<span class="field-error">{}</span>"#, escape(msg)))
        .unwrap_or_default()
}

fn validation_summary(errors: &ValidationErrors) -> &'static str {
    if errors.is_empty() {
        ""
    } else {
        r#"<p class="validation-summary">Please correct the highlighted fields.</p>"#
    }
}

/// Text input row for a form
fn text_input(label: &str, name: &str, value: &str, input_type: &str, errors: &ValidationErrors) -> String {
    format!(
        r#"            <p>
                <label for="{name}">{label}</label><br>
                <input type="{input_type}" id="{name}" name="{name}" value="{value}">
                {error}
            </p>
"#,
        label = escape(label),
        name = name,
        input_type = input_type,
        value = escape(value),
        error = field_error(errors, name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("大烏，主力耳機"), "大烏，主力耳機");
    }

    #[test]
    fn test_error_page_mentions_status() {
        let Html(body) = error_page(StatusCode::NOT_FOUND, "No record with id '7'");
        assert!(body.contains("404 Not Found"));
        assert!(body.contains("No record with id &#39;7&#39;"));
    }

    #[test]
    fn test_form_mode_actions() {
        assert_eq!(FormMode::Create.action("Brands"), "/Brands/Create");
        assert_eq!(FormMode::Edit(3).action("Equipments"), "/Equipments/Edit/3");
    }
}
