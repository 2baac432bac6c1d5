use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::{Value, json};

use rapport_model::FallbackStrategy;

use crate::cli::OutputArg;
use crate::types::{ParseReport, ParseStatus};

pub fn print_report(report: &ParseReport, output: OutputArg) {
    match output {
        OutputArg::Text => print!("{}", render_text(report)),
        OutputArg::Json => println!("{}", render_json(report)),
    }
}

fn render_text(report: &ParseReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Target: {}\n", report.target));
    out.push_str(&format!("Operation: {}\n", report.operation));
    out.push_str(&format!("Model: {}\n", report.model));
    match &report.status {
        ParseStatus::Parsed => out.push_str("Status: parsed\n"),
        ParseStatus::Recovered {
            strategy,
            confidence,
        } => {
            out.push_str(&format!(
                "Status: recovered ({}, confidence {confidence:.2})\n",
                strategy.description()
            ));
        }
        ParseStatus::Failed { error, attempted } => {
            out.push_str("Status: failed\n");
            out.push_str(&format!("Error: {error}\n"));
            let tried: Vec<&str> = attempted.iter().copied().map(FallbackStrategy::as_str).collect();
            out.push_str(&format!("Attempted: {}\n", tried.join(", ")));
        }
    }
    if let Some(value) = &report.value {
        out.push_str(&format!("{}\n", field_table(value)));
    }
    out
}

fn render_json(report: &ParseReport) -> Value {
    let mut doc = serde_json::Map::new();
    doc.insert("target".to_string(), json!(report.target));
    doc.insert("operation".to_string(), json!(report.operation));
    doc.insert("model".to_string(), json!(report.model));
    doc.insert("status".to_string(), json!(report.status.tag()));
    match &report.status {
        ParseStatus::Parsed => {}
        ParseStatus::Recovered {
            strategy,
            confidence,
        } => {
            doc.insert("strategy".to_string(), json!(strategy));
            doc.insert(
                "confidence".to_string(),
                json!(confidence_number(*confidence)),
            );
        }
        ParseStatus::Failed { error, attempted } => {
            doc.insert("error".to_string(), json!(error.to_string()));
            doc.insert("attempted".to_string(), json!(attempted));
        }
    }
    if let Some(value) = &report.value {
        doc.insert("value".to_string(), value.clone());
    }
    Value::Object(doc)
}

/// Ladder confidences are two-decimal constants; strip f32 widening noise.
fn confidence_number(confidence: f32) -> f64 {
    (f64::from(confidence) * 100.0).round() / 100.0
}

fn field_table(value: &Value) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    if let Some(map) = value.as_object() {
        for (key, entry) in map {
            table.add_row(vec![Cell::new(key), value_cell(entry)]);
        }
    } else {
        table.add_row(vec![Cell::new("value"), value_cell(value)]);
    }
    table
}

fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => dim_cell("-"),
        Value::String(text) => Cell::new(text),
        Value::Array(items) => {
            if items.is_empty() {
                return dim_cell("(empty)");
            }
            let lines: Vec<String> = items.iter().map(render_item).collect();
            Cell::new(lines.join("\n"))
        }
        other => Cell::new(other.to_string()),
    }
}

fn render_item(item: &Value) -> String {
    match item {
        Value::String(text) => format!("- {text}"),
        Value::Object(map) => match (map.get("category"), map.get("content")) {
            (Some(Value::String(category)), Some(Value::String(content))) => {
                format!("- {category}: {content}")
            }
            _ => format!("- {item}"),
        },
        other => format!("- {other}"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
