//! JSON-RPC 2.0 wire model: requests, responses, parameter payloads.
//!
//! The transport only ever sees these shapes as encoded text. Requests carry
//! an `id` only when a reply is expected; notifications omit it entirely.

use crate::domain::correlation::CorrelationId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Protocol version string carried by every message
pub const JSONRPC_VERSION: &str = "2.0";

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// Parameter payload attached to a request.
///
/// "No params" is a distinguished empty positional list (`[]`), never `null`,
/// so encoding stays uniform across all three call modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcParams {
    /// Positional parameters (`[1, 2]`)
    Positional(Vec<Value>),
    /// Named parameters (`{"a": 1, "b": 2}`)
    Named(serde_json::Map<String, Value>),
}

impl RpcParams {
    /// The distinguished empty payload
    pub fn none() -> Self {
        Self::Positional(Vec::new())
    }

    /// Positional parameters from a list of values
    pub fn positional(values: Vec<Value>) -> Self {
        Self::Positional(values)
    }

    /// Named parameters from a JSON object map
    pub fn named(map: serde_json::Map<String, Value>) -> Self {
        Self::Named(map)
    }

    /// True for the empty payload
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Positional(v) => v.is_empty(),
            Self::Named(m) => m.is_empty(),
        }
    }
}

impl Default for RpcParams {
    fn default() -> Self {
        Self::none()
    }
}

/// Outbound JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Protocol version, always "2.0"
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    /// Method name
    pub method: String,
    /// Parameter payload
    #[serde(default)]
    pub params: RpcParams,
    /// Correlation ID; present only when a reply is expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CorrelationId>,
}

impl RpcRequest {
    /// Build a notification: no id, no reply expected
    pub fn notification(method: impl Into<String>, params: RpcParams) -> Self {
        Self {
            jsonrpc: default_version(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// Build a correlated request expecting a reply
    pub fn call(id: CorrelationId, method: impl Into<String>, params: RpcParams) -> Self {
        Self {
            jsonrpc: default_version(),
            method: method.into(),
            params,
            id: Some(id),
        }
    }

    /// Encode to wire text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Inbound JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Protocol version
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    /// Correlation ID of the request this answers, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CorrelationId>,
    /// Result payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error descriptor on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Build a success response (test and loopback use)
    pub fn success(id: CorrelationId, result: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response
    pub fn failure(id: Option<CorrelationId>, error: RpcErrorObject) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Decode from wire text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Encode to wire text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// True when the response carries an error descriptor
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Split into the application-level outcome
    pub fn into_result(self) -> Result<Value, RpcErrorObject> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// JSON-RPC error descriptor carried inside a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    /// JSON-RPC error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Optional additional data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcErrorObject {
    /// Create a new error descriptor
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error descriptor with additional data
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl fmt::Display for RpcErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcErrorObject {}
