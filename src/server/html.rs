//! Plain HTML rendering for the listing, form, and error pages

use crate::entity::EntityKind;
use crate::model::{form_fields, FieldSpec, InputKind, ROLE_FIELDS};
use crate::record::{Listing, RefOption};
use axum::http::StatusCode;
use std::fmt::Write;

/// Escape text for element content and double-quoted attributes
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

fn nav() -> String {
    let mut out = String::from("<nav><a href=\"/about-us\">About us</a>");
    for kind in EntityKind::all() {
        let _ = write!(
            out,
            " | <a href=\"{}\">{}</a> (<a href=\"{}\">new</a>)",
            kind.listing_path(),
            kind.plural_label(),
            kind.create_path()
        );
    }
    out.push_str("</nav>");
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n{nav}\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        nav = nav(),
        body = body,
    )
}

pub fn about_page() -> String {
    page(
        "About us",
        "<p>Real-estate record keeping: addresses, people and their roles as owners, \
         agents and clients, properties with their locations, contracts and payments.</p>",
    )
}

pub fn listing_page(listing: &Listing) -> String {
    let kind = listing.kind;
    let mut body = format!(
        "<p><a href=\"{}\">Add {}</a></p>\n",
        kind.create_path(),
        kind.as_str()
    );

    if listing.is_empty() {
        let _ = write!(body, "<p>No {} yet.</p>", kind.plural_label().to_lowercase());
        return page(kind.plural_label(), &body);
    }

    body.push_str("<table>\n<thead><tr>");
    for column in &listing.columns {
        let _ = write!(body, "<th>{}</th>", escape(column));
    }
    body.push_str("</tr></thead>\n<tbody>\n");
    for record in &listing.records {
        body.push_str("<tr>");
        for value in record.values() {
            let _ = write!(body, "<td>{}</td>", escape(&value.to_string()));
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>");

    page(kind.plural_label(), &body)
}

/// Create form for `kind`. `options` holds the dropdown entries for each
/// foreign-key field.
pub fn form_page(kind: EntityKind, options: &[(&'static str, Vec<RefOption>)]) -> String {
    let mut body = format!(
        "<form method=\"post\" action=\"{}\">\n",
        kind.create_path()
    );

    for spec in form_fields(kind) {
        let choices = options
            .iter()
            .find(|(field, _)| *field == spec.name)
            .map(|(_, choices)| choices.as_slice())
            .unwrap_or(&[]);
        body.push_str(&input(spec, choices));
    }

    if kind == EntityKind::Person {
        body.push_str(
            "<p><label for=\"role\">Role</label> <select name=\"role\" id=\"role\">\
             <option value=\"\">none</option>",
        );
        for role in EntityKind::all().iter().filter(|k| k.is_role()) {
            let _ = write!(body, "<option value=\"{0}\">{0}</option>", role.as_str());
        }
        body.push_str("</select></p>\n");
        for spec in ROLE_FIELDS {
            body.push_str(&input(spec, &[]));
        }
    }

    body.push_str("<p><button type=\"submit\">Create</button></p>\n</form>");
    page(&format!("New {}", kind.as_str()), &body)
}

fn input(spec: &FieldSpec, choices: &[RefOption]) -> String {
    let required = if spec.required { " required" } else { "" };
    let control = match spec.input {
        InputKind::Reference(_) => {
            let mut select = format!("<select name=\"{0}\" id=\"{0}\"{1}>", spec.name, required);
            if !spec.required {
                select.push_str("<option value=\"\">-</option>");
            }
            for choice in choices {
                let _ = write!(
                    select,
                    "<option value=\"{}\">{}</option>",
                    choice.id,
                    escape(&choice.label)
                );
            }
            select.push_str("</select>");
            select
        }
        other => {
            let (kind, step) = match other {
                InputKind::Integer => ("number", " step=\"1\""),
                InputKind::Decimal => ("number", " step=\"any\""),
                InputKind::Date => ("date", ""),
                InputKind::Email => ("email", ""),
                InputKind::Phone => ("tel", ""),
                _ => ("text", ""),
            };
            format!(
                "<input type=\"{kind}\"{step} name=\"{0}\" id=\"{0}\"{required}>",
                spec.name
            )
        }
    };

    format!(
        "<p><label for=\"{}\">{}</label> {}</p>\n",
        spec.name,
        escape(spec.label),
        control
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    page(title, &format!("<p>{}</p>", escape(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, Value};

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"O'Hara\" & co</b>"), "&lt;b&gt;&quot;O&#39;Hara&quot; &amp; co&lt;/b&gt;");
    }

    #[test]
    fn test_listing_page_escapes_cells() {
        let listing = Listing {
            kind: EntityKind::Address,
            columns: vec!["address_id".to_string(), "address_line".to_string()],
            records: vec![Record::new(vec![
                ("address_id".to_string(), Value::Integer(1)),
                ("address_line".to_string(), Value::Text("<script>".to_string())),
            ])],
        };

        let html = listing_page(&listing);
        assert!(html.contains("<th>address_line</th>"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(!html.contains("<td><script>"));
    }

    #[test]
    fn test_form_page_renders_dropdowns() {
        let options = vec![
            ("location_id", vec![RefOption { id: 4, label: "51.5, -0.12".to_string() }]),
            ("owner_id", vec![RefOption { id: 2, label: "Peter Pan".to_string() }]),
        ];

        let html = form_page(EntityKind::Property, &options);
        assert!(html.contains("action=\"/create_property\""));
        assert!(html.contains("<select name=\"owner_id\" id=\"owner_id\" required>"));
        assert!(html.contains("<option value=\"2\">Peter Pan</option>"));
        // optional reference gets a blank choice
        assert!(html.contains("<select name=\"location_id\" id=\"location_id\"><option value=\"\">-</option>"));
        assert!(html.contains("name=\"price\" id=\"price\" required"));
    }

    #[test]
    fn test_person_form_offers_roles() {
        let html = form_page(EntityKind::Person, &[]);
        assert!(html.contains("<select name=\"role\" id=\"role\">"));
        assert!(html.contains("name=\"employment_date\""));
    }
}
