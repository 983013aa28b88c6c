//! The one response envelope every command returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::HandlerError;
use crate::pagination::{Page, Pagination};

/// `{ success, message?, data?, pagination? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// HTTP status for the transport; not part of the body.
    #[serde(skip)]
    pub status: u16,
}

impl ApiResponse {
    fn success(status: u16, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message,
            data,
            pagination: None,
            status,
        }
    }

    /// `200` with a payload.
    pub fn ok<T: Serialize>(data: &T) -> Result<Self, HandlerError> {
        Ok(Self::success(200, None, Some(serde_json::to_value(data)?)))
    }

    /// `200` with a message only.
    pub fn message(message: impl Into<String>) -> Self {
        Self::success(200, Some(message.into()), None)
    }

    /// `200` with a message and a payload.
    pub fn ok_with_message<T: Serialize>(message: impl Into<String>, data: &T) -> Result<Self, HandlerError> {
        Ok(Self::success(200, Some(message.into()), Some(serde_json::to_value(data)?)))
    }

    /// `201` with a message and the created resource.
    pub fn created<T: Serialize>(message: impl Into<String>, data: &T) -> Result<Self, HandlerError> {
        Ok(Self::success(201, Some(message.into()), Some(serde_json::to_value(data)?)))
    }

    /// `200` with one page of a listing.
    pub fn page<T: Serialize>(page: &Page<T>) -> Result<Self, HandlerError> {
        let mut response = Self::success(200, None, Some(serde_json::to_value(&page.items)?));
        response.pagination = Some(page.pagination);
        Ok(response)
    }

    /// `{ success: false, message }` with the error's status.
    pub fn error(err: &HandlerError) -> Self {
        Self {
            success: false,
            message: Some(err.to_string()),
            data: None,
            pagination: None,
            status: err.status_code(),
        }
    }
}
