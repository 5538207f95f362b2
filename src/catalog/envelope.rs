//! Catalog JSON envelope
//!
//! ```text
//! {"response": {"header": {"resultCode": "0000", "resultMsg": "OK"},
//!               "body": {"items": {"item": [...]}, "numOfRows": 100,
//!                        "pageNo": 1, "totalCount": 3}}}
//! ```
//!
//! `items` is `""` when the search is empty, and `item` is a bare object when
//! there is exactly one hit. Some gateways drop the wrapper and send `items` as
//! a plain list. All of that is folded into a plain `Vec` here so
//! nothing downstream has to look at the shape again.

use crate::error::FetchFailure;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SUCCESS_CODE: &str = "0000";

/// Body of a successful catalog call, items still raw
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    pub items: Vec<Value>,
    pub total_count: Option<u64>,
    pub page_no: Option<u64>,
    pub num_of_rows: Option<u64>,
}

impl RawPayload {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decode a response body
    pub fn from_json_str(body: &str) -> Result<Self, FetchFailure> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| FetchFailure::InvalidBody(e.to_string()))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, FetchFailure> {
        // Gateway-level errors come back without the `response` wrapper.
        if value.get("response").is_none() {
            if let Some(code) = value.get("resultCode") {
                return Err(FetchFailure::Api {
                    code: scalar_to_string(code),
                    message: value
                        .get("resultMsg")
                        .map(scalar_to_string)
                        .unwrap_or_default(),
                });
            }
        }

        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| FetchFailure::InvalidBody(format!("unexpected envelope: {e}")))?;
        envelope.response.into_payload()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Response,
}

#[derive(Debug, Deserialize)]
struct Response {
    header: Header,
    #[serde(default)]
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(rename = "resultCode")]
    result_code: Value,
    #[serde(rename = "resultMsg", default)]
    result_msg: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    items: Option<ItemsField>,
    #[serde(rename = "numOfRows", default)]
    num_of_rows: Option<Value>,
    #[serde(rename = "pageNo", default)]
    page_no: Option<Value>,
    #[serde(rename = "totalCount", default)]
    total_count: Option<Value>,
}

/// `body.items`: a bare list, `{"item": ...}` or the empty string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemsField {
    // first, so a sequence never reaches the struct variant
    List(Vec<Value>),
    Wrapped {
        #[serde(default)]
        item: Option<OneOrMany>,
    },
    Blank(String),
}

/// `body.items.item`: a list, or a single object for one hit
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Value>),
    One(Value),
}

impl ItemsField {
    fn into_vec(self) -> Vec<Value> {
        match self {
            ItemsField::List(items)
            | ItemsField::Wrapped {
                item: Some(OneOrMany::Many(items)),
            } => items,
            ItemsField::Wrapped {
                item: Some(OneOrMany::One(item)),
            } => vec![item],
            ItemsField::Wrapped { item: None } | ItemsField::Blank(_) => Vec::new(),
        }
    }
}

impl Response {
    fn into_payload(self) -> Result<RawPayload, FetchFailure> {
        let code = scalar_to_string(&self.header.result_code);
        if code != SUCCESS_CODE {
            return Err(FetchFailure::Api {
                code,
                message: self
                    .header
                    .result_msg
                    .as_ref()
                    .map(scalar_to_string)
                    .unwrap_or_default(),
            });
        }

        let Some(body) = self.body else {
            return Ok(RawPayload::empty());
        };

        Ok(RawPayload {
            items: body.items.map(ItemsField::into_vec).unwrap_or_default(),
            total_count: body.total_count.as_ref().and_then(lenient_u64),
            page_no: body.page_no.as_ref().and_then(lenient_u64),
            num_of_rows: body.num_of_rows.as_ref().and_then(lenient_u64),
        })
    }
}

/// Numbers arrive as either JSON numbers or numeric strings
fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
