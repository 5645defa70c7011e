use std::collections::BTreeMap;

use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use cirro_provision::Outcome;

use crate::cli::OutputFormat;

pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
        OutputFormat::Yaml => {
            println!("{}", format_yaml(value, 0));
        }
        OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
    }
}

/// Renders a reconcile outcome: a changed/unchanged line, then the
/// resulting resource when one is known.
pub fn print_outcome(outcome: &Outcome, format: OutputFormat) {
    if outcome.changed {
        println!("{} changed", "✓".green());
    } else {
        println!("{} unchanged", "=".cyan());
    }
    if let Some(resource) = &outcome.resource {
        print_value(resource, format);
    }
}

/// Renders a keyed collection; the table format shows id, name, and
/// status columns extracted from each record.
pub fn print_collection(records: &BTreeMap<String, Value>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No resources found.");
                return;
            }
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Status"]);
            for (key, record) in records {
                builder.push_record([
                    key.as_str(),
                    summary_name(record).unwrap_or("-"),
                    summary_status(record).unwrap_or("-"),
                ]);
            }
            let table = builder.build().with(Style::rounded()).to_string();
            println!("{table}");
            println!("Total: {}", records.len());
        }
        other => {
            let value = serde_json::to_value(records).unwrap_or(Value::Null);
            print_value(&value, other);
        }
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn summary_name(record: &Value) -> Option<&str> {
    ["/display_name", "/name", "/spec/display_name", "/full_name", "/email"]
        .iter()
        .find_map(|pointer| record.pointer(pointer).and_then(Value::as_str))
}

fn summary_status(record: &Value) -> Option<&str> {
    ["/status/phase", "/status/state", "/status", "/role"]
        .iter()
        .find_map(|pointer| record.pointer(pointer).and_then(Value::as_str))
}

fn format_yaml(value: &Value, indent: usize) -> String {
    let prefix = " ".repeat(indent);
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.contains('\n') || s.contains(':') || s.contains('#') {
                format!(
                    "|\n{}{}",
                    " ".repeat(indent + 2),
                    s.replace('\n', &format!("\n{}", " ".repeat(indent + 2)))
                )
            } else {
                format!("\"{s}\"")
            }
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                return "[]".to_string();
            }
            let items: Vec<String> = arr
                .iter()
                .map(|v| format!("{prefix}- {}", format_yaml(v, indent + 2)))
                .collect();
            format!("\n{}", items.join("\n"))
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                return "{}".to_string();
            }
            let items: Vec<String> = obj
                .iter()
                .map(|(k, v)| {
                    let val = format_yaml(v, indent + 2);
                    if val.starts_with('\n') {
                        format!("{prefix}{k}:{val}")
                    } else {
                        format!("{prefix}{k}: {val}")
                    }
                })
                .collect();
            if indent == 0 {
                items.join("\n")
            } else {
                format!("\n{}", items.join("\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_name_prefers_display_name() {
        let record = json!({"display_name": "prod", "name": "other"});
        assert_eq!(summary_name(&record), Some("prod"));
    }

    #[test]
    fn test_summary_name_reads_nested_spec() {
        let record = json!({"id": "lkc-1", "spec": {"display_name": "kafka-main"}});
        assert_eq!(summary_name(&record), Some("kafka-main"));
    }

    #[test]
    fn test_summary_status_reads_cluster_phase() {
        let record = json!({"status": {"phase": "PROVISIONED"}});
        assert_eq!(summary_status(&record), Some("PROVISIONED"));
    }

    #[test]
    fn test_summary_status_reads_connector_state() {
        let record = json!({"status": {"state": "RUNNING"}});
        assert_eq!(summary_status(&record), Some("RUNNING"));
    }

    #[test]
    fn test_format_yaml_scalars() {
        assert_eq!(format_yaml(&json!(true), 0), "true");
        assert_eq!(format_yaml(&json!("plain"), 0), "\"plain\"");
        assert_eq!(format_yaml(&json!(null), 0), "null");
    }
}
