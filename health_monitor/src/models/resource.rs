//! Resource registration models

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Kinds of external dependency the monitor knows how to probe.
///
/// The declaration order is the dispatch order used by checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    ServiceUrl,
    RedisClient,
    ElasticsearchClient,
    PostgresPromiseClient,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::ServiceUrl,
        ResourceKind::RedisClient,
        ResourceKind::ElasticsearchClient,
        ResourceKind::PostgresPromiseClient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ServiceUrl => "serviceUrl",
            ResourceKind::RedisClient => "redisClient",
            ResourceKind::ElasticsearchClient => "elasticsearchClient",
            ResourceKind::PostgresPromiseClient => "postgresPromiseClient",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| MonitorError::UnknownKind(s.to_string()))
    }
}

/// Registration input. `type`, `name` and `handle` are required; `critical`
/// defaults to false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Resource {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Resource type cannot be empty"))]
    pub kind: String,

    #[validate(length(min = 1, message = "Resource name cannot be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "Resource handle cannot be empty"))]
    pub handle: String,

    pub critical: bool,
}

impl Resource {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            handle: handle.into(),
            critical: false,
        }
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }
}

/// A resource as currently held by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredResource {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    pub handle: String,
    pub critical: bool,
}
