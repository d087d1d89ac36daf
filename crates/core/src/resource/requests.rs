//! API request types for resource operations.
//!
//! Pure data types with no I/O; the HTTP layer deserializes them and the
//! store consumes the [`ResourceInput`] they produce.

use serde::{Deserialize, Serialize};

use super::operations::DEFAULT_PAGE_SIZE;
use super::types::{Resource, ResourceInput};

/// Request payload for creating a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResourceRequest {
    pub name: String,
    pub ip: String,
}

impl CreateResourceRequest {
    /// Convert into repository input, trimming surrounding whitespace.
    pub fn into_input(self) -> ResourceInput {
        ResourceInput::new(self.name.trim(), self.ip.trim())
    }
}

/// Request payload for a partial update; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResourceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl UpdateResourceRequest {
    /// Merge the requested changes over the current resource.
    pub fn apply_to(self, current: &Resource) -> ResourceInput {
        ResourceInput::new(
            self.name
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| current.name.clone()),
            self.ip
                .map(|ip| ip.trim().to_string())
                .unwrap_or_else(|| current.ip.clone()),
        )
    }
}

/// Query parameters for listing resources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListResourcesQuery {
    /// 1-based page number (default: 1)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Resources per page (default: 10)
    #[serde(default = "default_page_size", rename = "pageSize")]
    pub page_size: u32,
    /// Case-insensitive name filter (default: no filter)
    #[serde(default)]
    pub name: String,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
