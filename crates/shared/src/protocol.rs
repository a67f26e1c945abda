//! List endpoint envelopes and request parameters.
//!
//! The list endpoints are not consistent about their envelope. A response is one of:
//!
//! * a bare array of entities,
//! * an object with an items-like array (`items`, `addresses` or `customers`),
//! * an object with a generic `data` array,
//!
//! the latter two optionally carrying `totalPages` / `totalCount`. [`ListResponse`] is the
//! explicit decode of those three cases and [`ListResponse::into_page`] maps all of them onto
//! one [`ListPage`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Items-like field names, probed in order before `data`.
pub const ITEM_FIELDS: [&str; 3] = ["items", "addresses", "customers"];
pub const DATA_FIELD: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Items {
        items: Vec<T>,
        total_pages: Option<u64>,
        total_count: Option<u64>,
    },
    Data {
        items: Vec<T>,
        total_pages: Option<u64>,
        total_count: Option<u64>,
    },
    /// Anything else. Holds a short description of what was received.
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
    pub total_count: u64,
}

impl<T> ListPage<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
            total_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized list response shape: {reason}")]
pub struct ListShapeError {
    pub reason: String,
}

impl<T: DeserializeOwned> ListResponse<T> {
    pub fn from_value(value: Value) -> Self {
        Self::decode(value).0
    }

    /// Like [`Self::from_value`], also returning why each skipped entry failed to decode.
    /// Entries that do not decode are left out; the rest of the page is kept.
    pub fn decode(value: Value) -> (Self, Vec<String>) {
        match value {
            Value::Array(entries) => {
                let (items, rejected) = decode_entries(entries);
                (Self::Bare(items), rejected)
            }
            Value::Object(mut fields) => {
                let total_pages = fields.get("totalPages").and_then(Value::as_u64);
                let total_count = fields.get("totalCount").and_then(Value::as_u64);

                for key in ITEM_FIELDS {
                    if let Some(Value::Array(entries)) = fields.remove(key) {
                        let (items, rejected) = decode_entries(entries);
                        let response = Self::Items {
                            items,
                            total_pages,
                            total_count,
                        };
                        return (response, rejected);
                    }
                }

                if let Some(Value::Array(entries)) = fields.remove(DATA_FIELD) {
                    let (items, rejected) = decode_entries(entries);
                    let response = Self::Data {
                        items,
                        total_pages,
                        total_count,
                    };
                    return (response, rejected);
                }

                (Self::Unrecognized(describe_object(&fields)), Vec::new())
            }
            other => (
                Self::Unrecognized(format!("expected array or object, got {}", kind(&other))),
                Vec::new(),
            ),
        }
    }
}

impl<T> ListResponse<T> {
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Bare(_) => "bare",
            Self::Items { .. } => "items",
            Self::Data { .. } => "data",
            Self::Unrecognized(_) => "unrecognized",
        }
    }

    /// Missing or zero `totalPages` reads as 1, missing or zero `totalCount` as the item count.
    pub fn into_page(self) -> Result<ListPage<T>, ListShapeError> {
        match self {
            Self::Bare(items) => {
                let total_count = items.len() as u64;
                Ok(ListPage {
                    items,
                    total_pages: 1,
                    total_count,
                })
            }
            Self::Items {
                items,
                total_pages,
                total_count,
            }
            | Self::Data {
                items,
                total_pages,
                total_count,
            } => {
                let total_count = total_count
                    .filter(|count| *count > 0)
                    .unwrap_or(items.len() as u64);
                Ok(ListPage {
                    items,
                    total_pages: total_pages.filter(|pages| *pages > 0).unwrap_or(1),
                    total_count,
                })
            }
            Self::Unrecognized(reason) => Err(ListShapeError { reason }),
        }
    }
}

fn decode_entries<T: DeserializeOwned>(entries: Vec<Value>) -> (Vec<T>, Vec<String>) {
    let mut items = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(item) => items.push(item),
            Err(err) => rejected.push(format!("entry {index}: {err}")),
        }
    }
    (items, rejected)
}

fn describe_object(fields: &Map<String, Value>) -> String {
    if fields.is_empty() {
        return "empty object".to_string();
    }
    let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    format!("object without a list field (keys: {})", keys.join(", "))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered query parameters for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams(Vec<(String, String)>);

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
