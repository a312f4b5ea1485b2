use super::{ImportedListing, ListingImportError};
use serde_json::Value;

/// Reads the model's reply: either bare JSON or JSON inside a ``` fence.
/// The payload must carry a `building` object and a `units` array.
pub fn parse_model_reply(reply: &str) -> Result<ImportedListing, ListingImportError> {
    let body = fenced_body(reply).unwrap_or(reply).trim();
    let value: Value = serde_json::from_str(body)?;

    if !value.get("building").is_some_and(Value::is_object) {
        return Err(ListingImportError::UnexpectedStructure(
            "missing building object",
        ));
    }
    if !value.get("units").is_some_and(Value::is_array) {
        return Err(ListingImportError::UnexpectedStructure("missing units array"));
    }

    Ok(serde_json::from_value(value)?)
}

fn fenced_body(reply: &str) -> Option<&str> {
    let open = reply.find("```")?;
    let after_fence = &reply[open + 3..];
    let content_start = match after_fence.find('\n') {
        Some(newline) if after_fence[..newline].trim().chars().all(char::is_alphanumeric) => {
            newline + 1
        }
        _ => 0,
    };
    let content = &after_fence[content_start..];
    let close = content.find("```")?;
    Some(&content[..close])
}
