use serde_yaml::Value;
use time::{macros::format_description, Date};

use crate::errors::ReportError;

const HIGHLIGHT_OPEN: &str = r#"<span style="background:red;color:white"> __"#;
const HIGHLIGHT_CLOSE: &str = "__ </span>";

/// Integral values print without a decimal point, everything else with at
/// most two decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Wraps `text` in the highlight marker when `high` holds.
pub fn bold_if(text: impl AsRef<str>, high: bool) -> String {
    let text = text.as_ref();
    if high {
        format!("{HIGHLIGHT_OPEN}{text}{HIGHLIGHT_CLOSE}")
    } else {
        text.to_string()
    }
}

pub fn parse_date_key(key: &str) -> Result<Date, ReportError> {
    if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReportError::InvalidDateKey(key.to_string()));
    }
    Date::parse(key, format_description!("[year][month][day]"))
        .map_err(|_| ReportError::InvalidDateKey(key.to_string()))
}

/// `20240105` -> `2024/01/05`
pub fn format_date(key: &str) -> Result<String, ReportError> {
    let date = parse_date_key(key)?;
    date.format(format_description!("[year]/[month]/[day]"))
        .map_err(|_| ReportError::InvalidDateKey(key.to_string()))
}

/// `20240105` -> `2024/01`
pub fn format_month(key: &str) -> Result<String, ReportError> {
    let date = parse_date_key(key)?;
    date.format(format_description!("[year]/[month]"))
        .map_err(|_| ReportError::InvalidDateKey(key.to_string()))
}

/// Text of a YAML scalar as it would be written in the log. Numbers follow
/// [`format_number`] so `1.50` and `1.5` read the same.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Some(i.to_string()),
            (None, Some(u), _) => Some(u.to_string()),
            (None, None, Some(f)) => Some(format_number(f)),
            _ => None,
        },
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
