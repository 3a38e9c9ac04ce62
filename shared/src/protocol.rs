//! 协议层类型
//!
//! 请求描述、原始 HTTP 交换、响应信封以及后端要求的请求体。

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::User;
use crate::error::{ApiError, ApiResult};

/// 登录接口路径（相对 API 根地址）
pub const LOGIN_PATH: &str = "/login";

/// API 请求的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 只有读请求可以在传输失败后重放
    pub fn is_idempotent_read(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 对单个路径段做百分号编码
pub fn segment(value: impl fmt::Display) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}

// =========================================================
// Call descriptor
// =========================================================

/// 一次后端调用：方法、相对路径、查询参数与请求体
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiCall {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// 将 `body` 序列化为 JSON 请求体
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            ApiError::serialization(e.to_string()).in_op_with("call.serialize", self.path.clone())
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn is_login(&self) -> bool {
        self.path == LOGIN_PATH
    }

    /// 路径加上编码后的查询串
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

// =========================================================
// Raw HTTP exchange (transport boundary)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: &Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 按 JSON 解析响应体；空响应体视为 `null`
    pub fn json(&self) -> ApiResult<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(ApiError::from)
    }

    /// 尽量从错误响应体中取出可读消息
    pub fn error_message(&self) -> String {
        self.json()
            .ok()
            .as_ref()
            .and_then(message_of)
            .unwrap_or_else(|| format!("request failed with status {}", self.status))
    }
}

fn message_of(body: &Value) -> Option<String> {
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

// =========================================================
// Response envelope
// =========================================================

/// 包装对象中可能与 `data` 并列的键
const ENVELOPE_KEYS: [&str; 4] = ["success", "message", "code", "status"];

/// 所有 2xx 响应体的统一形态
///
/// 后端会返回裸值、`{ data: .. }` 包装以及 `{ success, message, <实体>: .. }`
/// 对象，在这里一次性归一为拒绝或负载。
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEnvelope {
    Rejected { message: String },
    Payload(Value),
}

impl ApiEnvelope {
    pub fn from_body(body: Value) -> Self {
        let Value::Object(mut map) = body else {
            return ApiEnvelope::Payload(body);
        };

        if map.get("success") == Some(&Value::Bool(false)) {
            let message = message_of(&Value::Object(map))
                .unwrap_or_else(|| "request rejected".to_string());
            return ApiEnvelope::Rejected { message };
        }

        let only_wraps_data = map.contains_key("data")
            && map
                .keys()
                .all(|k| k == "data" || ENVELOPE_KEYS.contains(&k.as_str()));
        if only_wraps_data {
            let data = map.remove("data").unwrap_or(Value::Null);
            return ApiEnvelope::Payload(data);
        }

        ApiEnvelope::Payload(Value::Object(map))
    }

    pub fn into_result(self) -> ApiResult<Value> {
        match self {
            ApiEnvelope::Payload(value) => Ok(value),
            ApiEnvelope::Rejected { message } => Err(ApiError::rejected(message)),
        }
    }
}

/// 从归一化负载中取出列表
///
/// 接受裸数组，或在 `entity_key`、`data` 下存放数组的对象。
/// 列表缺失或为 `null` 时返回空列表。
pub fn list_from<T: DeserializeOwned>(payload: Value, entity_key: &str) -> ApiResult<Vec<T>> {
    let list = match payload {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove(entity_key) {
            Some(found @ Value::Array(_)) => found,
            Some(Value::Null) | None => match map.remove("data") {
                Some(found @ Value::Array(_)) => found,
                _ => return Ok(Vec::new()),
            },
            Some(other) => {
                return Err(ApiError::decode(format!(
                    "expected `{}` to be a list, found {}",
                    entity_key,
                    kind_of(&other)
                )));
            }
        },
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::decode(format!(
                "expected a list of `{}`, found {}",
                entity_key,
                kind_of(&other)
            )));
        }
    };
    serde_json::from_value(list).map_err(|e| ApiError::from(e).in_op_with("list.decode", entity_key))
}

/// 取出 `key` 下的单个对象，不存在时使用负载本身
pub fn item_from<T: DeserializeOwned>(payload: Value, key: &str) -> ApiResult<T> {
    let item = match payload {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(item).map_err(|e| ApiError::from(e).in_op_with("item.decode", key))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// =========================================================
// Login envelope
// =========================================================

/// `POST /login` 的归一化结果
#[derive(Debug, Clone, PartialEq)]
pub struct LoginEnvelope {
    pub success: bool,
    pub token: String,
    /// 后端返回的 `user` 对象，缺失时为去掉信封字段的响应体
    pub data: Value,
    pub message: Option<String>,
}

/// 平铺登录响应中属于信封而非用户资料的字段
const LOGIN_ENVELOPE_KEYS: &[&str] = &["token", "message", "success"];

impl LoginEnvelope {
    pub fn from_body(body: Value) -> ApiResult<Self> {
        if let ApiEnvelope::Rejected { message } = ApiEnvelope::from_body(body.clone()) {
            return Err(ApiError::rejected(message));
        }

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::decode("login response carries no token"))?
            .to_string();
        let message = message_of(&body);
        let data = match body.get("user") {
            Some(user @ Value::Object(_)) => user.clone(),
            _ => {
                let mut profile = body;
                if let Value::Object(map) = &mut profile {
                    for key in LOGIN_ENVELOPE_KEYS {
                        map.remove(*key);
                    }
                }
                profile
            }
        };

        Ok(Self {
            success: true,
            token,
            data,
            message,
        })
    }

    /// 后端返回的用户资料，缺失时只带登录邮箱
    pub fn user_or(&self, email: &str) -> User {
        match serde_json::from_value::<User>(self.data.clone()) {
            Ok(user) if !user.email.is_empty() => user,
            Ok(mut user) => {
                user.email = email.to_string();
                user
            }
            Err(_) => User::with_email(email),
        }
    }
}

// =========================================================
// Request payloads
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyDistributorRequest {
    pub user_id: i64,
    pub distributor_code: String,
}

/// `add_server` / `update_server` 的请求体，只包含这十个字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ServerPayload {
    pub ip_address: String,
    pub region: String,
    pub cpu: Value,
    pub memory: Value,
    pub category_id: Option<i64>,
    pub server_name: String,
    pub storage: Value,
    pub bandwidth: Value,
    pub user_count: Value,
    pub total_traffic: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateAclRequest {
    pub user_id: i64,
    pub container_ids: Vec<i64>,
    pub server_id: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateSerialsRequest {
    pub count: u32,
    pub valid_days: i64,
    pub prefix: String,
}

impl GenerateSerialsRequest {
    /// 由表单原始输入构造；`valid_days` 取文本开头的整数，`"30 days"` 即 30
    pub fn from_form(count: u32, valid_days: &str, prefix: &str) -> ApiResult<Self> {
        let valid_days = leading_int(valid_days).ok_or_else(|| {
            ApiError::invalid_input(format!("valid_days is not a number: {:?}", valid_days))
        })?;
        Ok(Self {
            count,
            valid_days,
            prefix: prefix.to_string(),
        })
    }
}

fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSerialsRequest {
    pub serial_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficStatsRequest {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryNoticeRequest {
    pub user_id: i64,
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewRentalRequest {
    pub rental_id: i64,
    pub new_expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRequest {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRef {
    pub server_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRef {
    pub container_id: String,
}

/// 请求体原样透传的接口使用的任意 JSON 对象
pub type JsonObject = Map<String, Value>;
