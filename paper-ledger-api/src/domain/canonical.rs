//! Canonical serialization of ledger metadata.
//!
//! Hash inputs must be reproducible from the stored document alone, so the
//! metadata is rendered with sorted keys, `","`/`":"` separators and no
//! insignificant whitespace before hashing. Canonicalizing a document,
//! parsing the result and canonicalizing again yields the same text.

use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};

/// Render `metadata` as canonical text.
///
/// The ledger only records structured documents: anything other than a JSON
/// object is rejected with `InvalidMetadata`.
pub fn canonical_metadata_text(metadata: &Value) -> LedgerResult<String> {
    if !metadata.is_object() {
        return Err(LedgerError::InvalidMetadata(
            "metadata must be a JSON object".to_string(),
        ));
    }
    let mut out = String::new();
    write_value(metadata, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut String) -> LedgerResult<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out)?,
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            // Keys are sorted explicitly so the output does not depend on
            // serde_json's map ordering feature flags.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out)?;
                out.push(':');
                write_value(&map[key], out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_string(s: &str, out: &mut String) -> LedgerResult<()> {
    let escaped = serde_json::to_string(s)
        .map_err(|e| LedgerError::InvalidMetadata(format!("unserializable string: {e}")))?;
    out.push_str(&escaped);
    Ok(())
}
