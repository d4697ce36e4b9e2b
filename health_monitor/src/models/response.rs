//! Probe and check result models

use crate::error::CheckError;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "ok";

/// Result of probing a single resource. Any status other than `"ok"` is a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub resource: String,
    pub status: String,
}

impl ServiceResponse {
    pub fn ok(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            status: STATUS_OK.to_string(),
        }
    }

    pub fn with_status(resource: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            status: status.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Aggregate outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResponse {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_responses: Vec<ServiceResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<String>>,
}

impl ServerResponse {
    pub fn ok(service_responses: Vec<ServiceResponse>) -> Self {
        Self {
            status: 200,
            message: "Ok".to_string(),
            service_responses,
            failed: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

impl From<CheckError> for ServerResponse {
    fn from(err: CheckError) -> Self {
        Self {
            status: err.status(),
            message: err.message().to_string(),
            service_responses: Vec::new(),
            failed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub accepted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_response_status() {
        assert!(ServiceResponse::ok("graphql").is_ok());
        assert!(!ServiceResponse::with_status("graphql", "degraded").is_ok());
        assert!(!ServiceResponse::with_status("graphql", "OK").is_ok());
    }

    #[test]
    fn test_check_errors_become_empty_responses() {
        let response = ServerResponse::from(CheckError::NothingToCheck);
        assert_eq!(response.status, 500);
        assert_eq!(response.message, "Nothing to check");
        assert!(response.service_responses.is_empty());
        assert!(response.failed.is_none());

        let response = ServerResponse::from(CheckError::Timeout);
        assert_eq!(response.status, 503);
        assert_eq!(response.message, "Timed out while checking resources");

        let response = ServerResponse::from(CheckError::Generic("probe panicked".to_string()));
        assert_eq!(response.status, 500);
        assert_eq!(response.message, "Generic error");
    }

    #[test]
    fn test_error_outcomes_serialize_without_results() {
        let value = serde_json::to_value(ServerResponse::from(CheckError::NothingToCheck)).unwrap();
        assert_eq!(value, serde_json::json!({"status": 500, "message": "Nothing to check"}));

        let value = serde_json::to_value(ServerResponse::from(CheckError::Timeout)).unwrap();
        assert!(value.get("serviceResponses").is_none());
        assert!(value.get("failed").is_none());

        let parsed: ServerResponse = serde_json::from_value(value).unwrap();
        assert!(parsed.service_responses.is_empty());
    }

    #[test]
    fn test_server_response_serialization() {
        let response = ServerResponse::ok(vec![ServiceResponse::ok("graphql")]);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], 200);
        assert_eq!(value["message"], "Ok");
        assert_eq!(value["serviceResponses"][0]["resource"], "graphql");
        assert!(value.get("failed").is_none());

        let mut failing = response.clone();
        failing.failed = Some(vec!["graphql".to_string()]);
        let value = serde_json::to_value(&failing).unwrap();
        assert_eq!(value["failed"][0], "graphql");
    }
}
