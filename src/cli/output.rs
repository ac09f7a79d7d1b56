//! Output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{FalcataArgs, OutputFormat};
use crate::error::Result;

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &FalcataArgs) -> Result<()> {
    let rendered = render_result(message, result, args)?;
    println!("{rendered}");
    Ok(())
}

/// Render a result in the specified format without printing it.
pub fn render_result<T: Serialize>(
    message: &str,
    result: &T,
    args: &FalcataArgs,
) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => render_human(message, result, args),
        OutputFormat::Json => render_json(result, args),
    }
}

/// Render in JSON format.
fn render_json<T: Serialize>(result: &T, args: &FalcataArgs) -> Result<String> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

/// Render in human-readable format.
fn render_human<T: Serialize>(message: &str, result: &T, args: &FalcataArgs) -> Result<String> {
    let mut lines = Vec::new();
    if args.verbosity() > 0 {
        lines.push(message.to_string());
        lines.push("═".repeat(message.chars().count()));
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;
    render_value(&value, 0, &mut lines);

    Ok(lines.join("\n"))
}

/// Objects become `key: value` lines; arrays of objects become one compact
/// line per element.
fn render_value(value: &Value, indent: usize, lines: &mut Vec<String>) {
    let spaces = "  ".repeat(indent);

    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    Value::Object(inner) if !inner.is_empty() => {
                        lines.push(format!("{spaces}{key}:"));
                        render_value(val, indent + 1, lines);
                    }
                    Value::Array(arr) if arr.iter().any(Value::is_object) => {
                        lines.push(format!("{spaces}{key}:"));
                        render_value(val, indent + 1, lines);
                    }
                    _ => lines.push(format!("{spaces}{key}: {}", format_value(val))),
                }
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                lines.push(format!("{spaces}{}. {}", i + 1, format_inline(item)));
            }
        }
        _ => lines.push(format!("{spaces}{}", format_value(value))),
    }
}

/// Format an object on a single line.
fn format_inline(value: &Value) -> String {
    match value {
        Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}={}", format_value(val)))
            .collect::<Vec<_>>()
            .join("  "),
        other => format_value(other),
    }
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.4}"),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(obj) if obj.is_empty() => "{}".to_string(),
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::json;

    use super::*;

    fn args(extra: &[&str]) -> FalcataArgs {
        let mut argv = vec!["falcata"];
        argv.extend_from_slice(extra);
        argv.extend_from_slice(&["complete", "terms.txt", "ca"]);
        FalcataArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("test")), "test");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(0.5)), "0.5000");
        assert_eq!(format_value(&json!(false)), "false");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(["a", 1])), "[a, 1]");
    }

    #[test]
    fn test_render_json() {
        let rendered = render_result("ignored", &json!({"a": 1}), &args(&["-f", "json"])).unwrap();
        assert_eq!(rendered, r#"{"a":1}"#);
    }

    #[test]
    fn test_render_human() {
        let value = json!({
            "matches": [{"text": "apple", "distance": 1}],
            "total": 1
        });
        let rendered = render_result("Fuzzy matches", &value, &args(&["-q"])).unwrap();

        assert_eq!(rendered, "matches:\n  1. distance=1  text=apple\ntotal: 1");
    }

    #[test]
    fn test_render_human_with_header() {
        let rendered = render_result("Done", &json!({"ok": true}), &args(&[])).unwrap();
        assert_eq!(rendered, "Done\n════\nok: true");
    }
}
