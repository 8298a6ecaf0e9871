//! Server-side rendering of the simulation page.

use crate::models::{EditableField, SimulationInstance};
use crate::visualization::render_svg_chart;

pub const PAGE_TITLE: &str = "Software User Adoption";

/// Notices that can be shown above the instances, keyed by query value.
pub fn notice_text(key: &str) -> Option<&'static str> {
    match key {
        "last-instance" => Some("Cannot remove the last simulation instance."),
        "instance-limit" => Some("The maximum number of simulation instances has been reached."),
        _ => None,
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn push_line(html: &mut String, line: impl AsRef<str>) {
    html.push_str(line.as_ref());
    html.push('\n');
}

/// Render the controls and chart of one instance.
pub fn render_instance(instance: &SimulationInstance, position: usize) -> String {
    let id = instance.id;
    let mut html = String::new();
    push_line(&mut html, format!(r#"<section class="container" id="instance-{id}">"#));
    push_line(
        &mut html,
        format!(r#"<h2>Simulation Instance <span class="year">Year {position}</span></h2>"#),
    );
    push_line(
        &mut html,
        format!(r#"<form method="post" action="/instances/{id}/params">"#),
    );
    push_line(&mut html, r#"<div class="simulation-controls">"#);
    for field in EditableField::ALL {
        let name = field.name();
        push_line(
            &mut html,
            format!(
                r#"<div class="control-group"><label for="{name}-{id}">{label}</label><input id="{name}-{id}" name="{name}" type="number" step="any" value="{value}"></div>"#,
                label = escape_html(field.label()),
                value = instance.params.field_value(field)
            ),
        );
    }
    push_line(&mut html, "</div>");
    push_line(
        &mut html,
        format!(
            r#"<div class="button-row"><button type="submit" formaction="/instances/{id}/run">Run Simulation</button><button type="submit" class="secondary">Apply</button></div>"#
        ),
    );
    push_line(&mut html, "</form>");
    push_line(&mut html, r#"<div class="chart">"#);
    html.push_str(&render_svg_chart(&instance.data));
    push_line(&mut html, "</div>");
    push_line(&mut html, "</section>");
    html
}

/// Render the full page.
pub fn render_page(instances: &[SimulationInstance], notice: Option<&str>) -> String {
    let mut html = String::new();
    push_line(&mut html, "<!DOCTYPE html>");
    push_line(&mut html, r#"<html lang="en">"#);
    push_line(
        &mut html,
        format!(
            r#"<head><meta charset="utf-8"><title>{PAGE_TITLE}</title><link rel="stylesheet" href="/style.css"></head>"#
        ),
    );
    push_line(&mut html, "<body>");
    push_line(&mut html, format!(r#"<main class="container"><h1>{PAGE_TITLE}</h1>"#));

    if let Some(text) = notice {
        push_line(
            &mut html,
            format!(r#"<div class="notice" role="alert">{}</div>"#, escape_html(text)),
        );
    }

    for (i, instance) in instances.iter().enumerate() {
        html.push_str(&render_instance(instance, i + 1));
    }

    push_line(
        &mut html,
        r#"<div class="button-row"><form method="post" action="/instances/add"><button type="submit">Add Another Year</button></form><form method="post" action="/instances/remove-last"><button type="submit">Remove Last Simulation</button></form></div>"#,
    );
    push_line(&mut html, "</main>");
    push_line(&mut html, "</body>");
    push_line(&mut html, "</html>");
    html
}
