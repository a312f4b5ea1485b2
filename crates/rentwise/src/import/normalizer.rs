use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON number, a currency-ish string ("$1,250", "125 - 250",
/// "$95/mo"), or null. Strings take their first number.
pub(super) fn loose_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().filter(|amount| amount.is_finite()),
        Some(Value::String(text)) => first_amount(&text),
        _ => None,
    })
}

pub(super) fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_of))
}

pub(super) fn loose_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(text_of).collect(),
        Some(other) => text_of(other)
            .map(|text| {
                text.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        None => Vec::new(),
    })
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// First run of digits (with `,` separators and one decimal point) in `raw`.
pub(super) fn first_amount(raw: &str) -> Option<f64> {
    let start = raw.find(|ch: char| ch.is_ascii_digit())?;
    let mut digits = String::new();
    let mut seen_point = false;

    for ch in raw[start..].chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            ',' => continue,
            '.' if !seen_point => {
                seen_point = true;
                digits.push(ch);
            }
            _ => break,
        }
    }

    digits.trim_end_matches('.').parse::<f64>().ok()
}
