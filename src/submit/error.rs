use serde::Deserialize;
use thiserror::Error;

/// Failure reported by a submit handler.
///
/// Mirrors the error shape produced by the HTTP client:
/// `{ response: { status, data: { detail, message } }, message }`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Response {
        status: u16,
        data: ResponseData,
        message: Option<String>,
    },
    /// The request failed before a response arrived.
    #[error("{0}")]
    Message(String),
    /// The handler panicked while building or running its future.
    #[error("submit handler panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseData {
    pub detail: Option<serde_json::Value>,
    pub message: Option<String>,
}

impl ResponseData {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            detail: None,
            message: Some(message.into()),
        }
    }

    pub fn with_detail(detail: serde_json::Value) -> Self {
        Self {
            detail: Some(detail),
            message: None,
        }
    }

    /// Reads a response body. Bodies that are not objects (plain text, HTML)
    /// carry nothing usable; a `message` that is not a string is ignored.
    pub fn from_body(body: &serde_json::Value) -> Self {
        let Some(body) = body.as_object() else {
            return Self::default();
        };
        Self {
            detail: body.get("detail").filter(|detail| !detail.is_null()).cloned(),
            message: body
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }
}

/// One entry of a structured validation failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationDetail {
    #[serde(default)]
    pub loc: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl SubmitError {
    pub fn response(status: u16, data: ResponseData) -> Self {
        Self::Response {
            status,
            data,
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Status-422 style failure listing `(location, message)` pairs.
    pub fn validation<I, L, M>(status: u16, entries: I) -> Self
    where
        I: IntoIterator<Item = (L, M)>,
        L: IntoIterator<Item = serde_json::Value>,
        M: Into<String>,
    {
        let detail = entries
            .into_iter()
            .map(|(loc, msg)| {
                let loc = loc.into_iter().collect::<Vec<serde_json::Value>>();
                let msg: String = msg.into();
                serde_json::json!({ "loc": loc, "msg": msg })
            })
            .collect::<Vec<_>>();
        Self::response(status, ResponseData::with_detail(serde_json::Value::Array(detail)))
    }

    /// Parses the JSON form of an HTTP client error.
    ///
    /// Each field is read on its own and a field of the wrong type counts as
    /// absent. Anything without a `response.status` that fits a `u16` is
    /// treated as a transport failure carrying only its `message`.
    pub fn from_payload(payload: serde_json::Value) -> Self {
        let message = payload
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        let status = payload
            .pointer("/response/status")
            .and_then(serde_json::Value::as_u64)
            .and_then(|status| u16::try_from(status).ok());
        let Some(status) = status else {
            return Self::Message(message.unwrap_or_default());
        };
        let data = payload
            .pointer("/response/data")
            .map(ResponseData::from_body)
            .unwrap_or_default();
        Self::Response {
            status,
            data,
            message,
        }
    }

    pub fn with_own_message(self, own: impl Into<String>) -> Self {
        match self {
            Self::Response { status, data, .. } => Self::Response {
                status,
                data,
                message: Some(own.into()),
            },
            other => other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&ResponseData> {
        match self {
            Self::Response { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Detail entries when the failure has status `validation_status` and a
    /// list-shaped `detail`. Entries that are not objects come back empty and
    /// are skipped by the mapper.
    pub fn validation_entries(&self, validation_status: u16) -> Option<Vec<ValidationDetail>> {
        let Self::Response { status, data, .. } = self else {
            return None;
        };
        if *status != validation_status {
            return None;
        }
        let Some(serde_json::Value::Array(items)) = &data.detail else {
            return None;
        };
        Some(
            items
                .iter()
                .map(|item| {
                    serde_json::from_value::<ValidationDetail>(item.clone()).unwrap_or_default()
                })
                .collect(),
        )
    }

    /// Most specific message for a generic failure notification: server
    /// message, then a textual server detail, then the error's own message,
    /// then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let server = self.data().and_then(|data| {
            non_blank(data.message.as_deref()).or_else(|| match &data.detail {
                Some(serde_json::Value::String(detail)) => non_blank(Some(detail.as_str())),
                _ => None,
            })
        });
        let own = match self {
            Self::Response { message, .. } => non_blank(message.as_deref()),
            Self::Message(message) => non_blank(Some(message.as_str())),
            Self::Panicked(_) => None,
        };
        server.or(own).unwrap_or(fallback).to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ResponseData, SubmitError};
    use serde_json::json;

    #[test]
    fn payload_with_response_keeps_status_and_detail() {
        let err = SubmitError::from_payload(json!({
            "response": {
                "status": 422,
                "data": { "detail": [{ "loc": ["body", "email"], "msg": "invalid" }] }
            },
            "message": "Request failed with status code 422"
        }));
        assert_eq!(err.status(), Some(422));
        let entries = err.validation_entries(422).expect("validation entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].msg.as_deref(), Some("invalid"));
        assert!(err.validation_entries(400).is_none());
    }

    #[test]
    fn payload_without_response_is_a_message() {
        let err = SubmitError::from_payload(json!({ "message": "network down" }));
        assert_eq!(err, SubmitError::message("network down"));
        assert_eq!(err.user_message("An error occurred"), "network down");
    }

    #[test]
    fn text_response_body_falls_back_to_own_message() {
        let err = SubmitError::from_payload(json!({
            "response": { "status": 500, "data": "Internal Server Error" },
            "message": "Request failed with status code 500"
        }));
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.data(), Some(&ResponseData::default()));
        assert_eq!(
            err.user_message("An error occurred"),
            "Request failed with status code 500"
        );
    }

    #[test]
    fn mistyped_server_message_keeps_validation_detail() {
        let err = SubmitError::from_payload(json!({
            "response": {
                "status": 422,
                "data": {
                    "message": { "code": 1 },
                    "detail": [{ "loc": ["body", "sku"], "msg": "already used" }]
                }
            },
            "message": 7
        }));
        assert_eq!(err.status(), Some(422));
        let entries = err.validation_entries(422).expect("validation entries");
        assert_eq!(entries[0].msg.as_deref(), Some("already used"));
        assert_eq!(err.user_message("An error occurred"), "An error occurred");
    }

    #[test]
    fn out_of_range_status_is_a_transport_failure() {
        let err = SubmitError::from_payload(json!({
            "response": { "status": 70000 },
            "message": "socket hang up"
        }));
        assert_eq!(err, SubmitError::message("socket hang up"));
    }

    #[test]
    fn user_message_prefers_server_then_own_then_fallback() {
        let err = SubmitError::response(500, ResponseData::with_message("Supplier already exists"))
            .with_own_message("Request failed with status code 500");
        assert_eq!(err.user_message("fallback"), "Supplier already exists");

        let err = SubmitError::response(404, ResponseData::with_detail(json!("Part not found")));
        assert_eq!(err.user_message("fallback"), "Part not found");

        let err = SubmitError::response(500, ResponseData::default()).with_own_message("boom");
        assert_eq!(err.user_message("fallback"), "boom");

        assert_eq!(SubmitError::message("  ").user_message("fallback"), "fallback");
        assert_eq!(SubmitError::Panicked("oops".into()).user_message("fallback"), "fallback");
    }

    #[test]
    fn non_object_detail_entries_are_kept_as_empty() {
        let err = SubmitError::response(422, ResponseData::with_detail(json!(["bad", { "msg": "x" }])));
        let entries = err.validation_entries(422).expect("entries");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].loc.is_none() && entries[0].msg.is_none());
        assert!(entries[1].loc.is_none());
    }
}
