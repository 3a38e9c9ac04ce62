//! 显示格式化工具

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const DEFAULT_CURRENCY: &str = "¥";

const PLACEHOLDER: &str = "-";
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// 解析后端返回的时间文本
///
/// 接受 RFC 3339、RFC 2822（含 `GMT`）以及常见的无时区格式。
/// 带时区的值保留其原始的墙上时间，不做本地时区换算。
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// 格式化日期，如 `2024/01/31 08:05`；空值或无法解析时为 `-`
pub fn format_date(value: &str, with_time: bool) -> String {
    match parse_datetime(value) {
        Some(dt) if with_time => dt.format("%Y/%m/%d %H:%M").to_string(),
        Some(dt) => dt.format("%Y/%m/%d").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// 按 1024 进位换算，最多两位小数并去掉末尾的 0
fn scale_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes < 0.0 {
        return PLACEHOLDER.to_string();
    }
    if bytes == 0.0 {
        return "0 B".to_string();
    }

    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, SIZE_UNITS[unit])
}

pub fn format_file_size(bytes: u64) -> String {
    scale_bytes(bytes as f64)
}

/// 流量值可能是小数
pub fn format_traffic(bytes: f64) -> String {
    scale_bytes(bytes)
}

pub fn format_money(amount: f64, currency: &str) -> String {
    if !amount.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}{:.2}", currency, amount)
}

/// 后端金额字段的格式化；非数字时为 `-`
pub fn format_money_value(amount: &Value) -> String {
    match amount.as_f64() {
        Some(amount) => format_money(amount, DEFAULT_CURRENCY),
        None => PLACEHOLDER.to_string(),
    }
}

fn is_time_key(key: &str) -> bool {
    key.ends_with("_at") || key.contains("time") || key.contains("date")
}

fn is_money_key(key: &str) -> bool {
    ["revenue", "amount", "price", "income"]
        .iter()
        .any(|k| key.contains(k))
}

/// 指标或扩展字段的显示文本，按字段名选择格式
///
/// 嵌套对象逐项展开为 `子键: 值`，子键沿用父键前缀参与判断。
pub fn format_metric(key: &str, value: &Value) -> String {
    let key = key.to_ascii_lowercase();
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) if is_time_key(&key) => format_date(s, true),
        Value::String(s) => s.clone(),
        Value::Number(n) if key.contains("size") => match n.as_u64() {
            Some(bytes) => format_file_size(bytes),
            None => n.to_string(),
        },
        Value::Number(n) if key.contains("traffic") || key.contains("bytes") => {
            n.as_f64().map(format_traffic).unwrap_or_else(|| n.to_string())
        }
        Value::Number(_) if is_money_key(&key) => format_money_value(value),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, format_metric(&format!("{}_{}", key, k), v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
