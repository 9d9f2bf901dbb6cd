use lobviz_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Ndjson => {
            for line in ndjson_lines(envelope)? {
                println!("{line}");
            }
        }
        OutputFormat::Table => render_table(envelope)?,
    }

    Ok(())
}

/// Meta first, then one line per data item (or the whole data value when it
/// is not an array), then one line per error.
fn ndjson_lines(envelope: &Envelope<Value>) -> Result<Vec<String>, CliError> {
    let mut lines = vec![serde_json::to_string(&serde_json::json!({
        "meta": envelope.meta
    }))?];

    match &envelope.data {
        Value::Array(items) => {
            for item in items {
                lines.push(serde_json::to_string(&serde_json::json!({ "data": item }))?);
            }
        }
        other => lines.push(serde_json::to_string(&serde_json::json!({ "data": other }))?),
    }

    for error in &envelope.errors {
        lines.push(serde_json::to_string(&serde_json::json!({ "error": error }))?);
    }

    Ok(lines)
}

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("schema      : {}", envelope.meta.schema_version);
    println!("generated_at: {}", envelope.meta.generated_at);
    println!("input       : {}", envelope.meta.input);
    println!("rows_read   : {}", envelope.meta.rows_read);
    println!("rows_skipped: {}", envelope.meta.rows_skipped);
    println!("latency_ms  : {}", envelope.meta.latency_ms);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    println!("data:");
    let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
    for line in pretty_data.lines() {
        println!("  {line}");
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobviz_core::{EnvelopeError, EnvelopeMeta};
    use serde_json::json;

    fn envelope(data: Value) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", "lob.csv", 2, 0, 1).expect("meta");
        Envelope::success(meta, data)
    }

    #[test]
    fn ndjson_splits_array_data() {
        let lines = ndjson_lines(&envelope(json!([{"a": 1}, {"a": 2}]))).expect("render");
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("{\"meta\":"));
        assert_eq!(lines[2], "{\"data\":{\"a\":2}}");
    }

    #[test]
    fn ndjson_keeps_object_data_whole_and_appends_errors() {
        let mut envelope = envelope(json!({"cells": []}));
        envelope
            .push_error(EnvelopeError::new("empty_result", "no rows").expect("error"))
            .expect("push");

        let lines = ndjson_lines(&envelope).expect("render");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "{\"data\":{\"cells\":[]}}");
        assert!(lines[2].contains("empty_result"));
    }
}
