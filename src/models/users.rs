use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// One row of the users listing.
///
/// Every field is passed through as raw JSON: a row with a string age or no id still lands in
/// the list. Missing fields read as `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "firstname", alias = "firstName", default)]
    pub first_name: Value,
    #[serde(rename = "lastname", alias = "lastName", default)]
    pub last_name: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub branch: Value,
    #[serde(default)]
    pub age: Value,
    /// Fields the listing sends that this crate has no name for.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// A record carrying only an id.
    pub fn with_id(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            first_name: Value::Null,
            last_name: Value::Null,
            email: Value::Null,
            branch: Value::Null,
            age: Value::Null,
            extra: Map::new(),
        }
    }
}

/// Text for a passthrough field: strings unquoted, null as `-`, anything else as JSON.
pub fn field_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed("-"),
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Body of `GET <listing-endpoint>?page=&limit=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub users: Vec<UserRecord>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_users: u64,
}
