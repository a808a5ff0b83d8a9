use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list of name/description pairs, marking the current one
pub fn output_list(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[(&str, &str)],
    current: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let entries: Vec<Value> = items
                .iter()
                .map(|(name, label)| json!({ "name": name, "label": label, "current": Some(*name) == current }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: entries }))?);
        }
        OutputFormat::Text => {
            for (name, label) in items {
                let marker = if Some(*name) == current { "*" } else { " " };
                println!("{} {:<12} {}", marker, name, label);
            }
        }
    }
    Ok(())
}
