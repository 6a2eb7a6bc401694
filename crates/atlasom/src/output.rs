//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Redfish health (`OK`, `Warning`, `Critical`) or link state, colored.
pub fn paint_state(state: &str, color: bool) -> String {
    if !color {
        return state.to_owned();
    }
    match state.to_ascii_lowercase().as_str() {
        "ok" | "enabled" | "up" | "linkup" | "completed" | "mounted" | "connected" => {
            state.green().to_string()
        }
        "warning" | "starting" | "running" | "pending" => state.yellow().to_string(),
        "critical" | "down" | "linkdown" | "exception" | "killed" | "disconnected" => {
            state.red().to_string()
        }
        _ => state.to_owned(),
    }
}

/// Alarm severity as the appliance reports it (0 critical, 1 major, 2 minor).
pub fn paint_severity(severity: &str, color: bool) -> String {
    let label = match severity {
        "0" => "Critical",
        "1" => "Major",
        "2" => "Minor",
        other => other,
    };
    if !color {
        return label.to_owned();
    }
    match severity {
        "0" | "1" => label.red().to_string(),
        "2" => label.yellow().to_string(),
        _ => label.to_owned(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are key/value
/// pairs rather than rows.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Detail views ─────────────────────────────────────────────────────

/// Two-column key/value table for single-item views.
pub fn detail_table<K: AsRef<str>>(pairs: &[(K, String)]) -> String {
    let mut builder = Builder::default();
    for (key, value) in pairs {
        builder.push_record([key.as_ref(), value.as_str()]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Detail view of an arbitrary JSON object, nested values flattened to
/// dotted keys. Used for resources whose shape varies by firmware.
pub fn json_detail(value: &Value) -> String {
    let mut pairs = Vec::new();
    flatten(None, value, &mut pairs);
    if pairs.is_empty() {
        return String::new();
    }
    detail_table(&pairs)
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.starts_with("@odata") {
                    continue;
                }
                let key = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
                flatten(Some(&key), child, out);
            }
        }
        Value::Array(items) if items.iter().all(|item| !item.is_object()) => {
            let joined = items.iter().map(scalar).collect::<Vec<_>>().join(", ");
            out.push((prefix.unwrap_or_default().to_owned(), joined));
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let key = format!("{}[{i}]", prefix.unwrap_or_default());
                flatten(Some(&key), child, out);
            }
        }
        other => out.push((prefix.unwrap_or_default().to_owned(), scalar(other))),
    }
}

/// A JSON scalar as display text: strings unquoted, null as `-`.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Optional display value, `-` when absent.
pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

/// Optional raw JSON value, `-` when absent.
pub fn opt_value(value: Option<&Value>) -> String {
    value.map_or_else(|| "-".into(), scalar)
}

/// Byte counts arrive as numbers or numeric strings.
pub fn bytes(value: Option<&Value>) -> String {
    let count = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    count.map_or_else(|| opt_value(value), |n| bytesize::ByteSize(n).to_string())
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        render_json_compact(data)
    } else {
        render_json_pretty(data)
    }
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_objects_flatten_to_dotted_keys() {
        let mut pairs = Vec::new();
        flatten(
            None,
            &json!({
                "@odata.id": "/redfish/v1/Systems/Processors/Cpu",
                "Model": "Kunpeng",
                "Oem": { "Cores": 8, "Frequency": null },
                "Caches": ["L1", "L2"],
            }),
            &mut pairs,
        );
        assert!(pairs.contains(&("Model".into(), "Kunpeng".into())));
        assert!(pairs.contains(&("Oem.Cores".into(), "8".into())));
        assert!(pairs.contains(&("Oem.Frequency".into(), "-".into())));
        assert!(pairs.contains(&("Caches".into(), "L1, L2".into())));
        assert!(pairs.iter().all(|(k, _)| !k.starts_with("@odata")));
    }

    #[test]
    fn byte_counts_accept_strings() {
        assert_eq!(bytes(Some(&json!(1024))), bytesize::ByteSize(1024).to_string());
        assert_eq!(bytes(Some(&json!("2048"))), bytesize::ByteSize(2048).to_string());
        assert_eq!(bytes(Some(&json!("n/a"))), "n/a");
        assert_eq!(bytes(None), "-");
    }

    #[test]
    fn severity_labels_without_color() {
        assert_eq!(paint_severity("0", false), "Critical");
        assert_eq!(paint_severity("9", false), "9");
    }
}
