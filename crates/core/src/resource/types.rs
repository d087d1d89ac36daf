use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named network resource.
///
/// The id and timestamps are assigned by the repository; `name` is unique
/// across all resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub ip: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-supplied fields of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInput {
    pub name: String,
    pub ip: String,
}

impl ResourceInput {
    pub fn new(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
        }
    }
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of resources matching the filter.
    pub amount: u64,
    /// Number of pages needed to show every matching resource.
    pub pages: u64,
}

/// One page of resources plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePage {
    pub resources: Vec<Resource>,
    pub pagination: Pagination,
}

/// Change notification broadcast to connected listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceEvent {
    Created { resource: Resource },
    Updated { resource: Resource },
    Deleted { id: i64 },
}

impl ResourceEvent {
    /// Returns the SSE event name for this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            ResourceEvent::Created { .. } => "resource_created",
            ResourceEvent::Updated { .. } => "resource_updated",
            ResourceEvent::Deleted { .. } => "resource_deleted",
        }
    }
}
