use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Text => Ok(render_text(&serde_json::to_value(value)?)),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_text(value: &Value) -> String {
    match value {
        Value::Array(items) => render_list(items),
        Value::Object(map) => {
            let width = map.keys().map(String::len).max().unwrap_or(0);
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(key, v)| match v {
                    Value::Object(_) | Value::Array(_) => {
                        let nested = render_text(v)
                            .lines()
                            .map(|line| format!("  {line}"))
                            .collect::<Vec<_>>()
                            .join("\n");
                        format!("{key}:\n{nested}")
                    }
                    scalar => format!("{key:<width$}  {}", cell(scalar)),
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        scalar => cell(scalar),
    }
}

fn render_list(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(none)");
    }
    if !items.iter().all(Value::is_object) {
        return items.iter().map(cell).collect::<Vec<_>>().join("\n");
    }

    let mut headers = Vec::<&str>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    // `id` and `name` lead when present.
    headers.sort_by_key(|h| match *h {
        "id" => 0,
        "name" => 1,
        _ => 2,
    });

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| "-".to_string(), cell))
                .collect()
        })
        .collect::<Vec<_>>();

    table::render_table(&headers, &rows, terminal_width())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS").ok()?.trim().parse().ok()
}
