use thiserror::Error;

/// Errors that can occur when validating resources or listing parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Resource name cannot be empty")]
    EmptyName,
    #[error("Resource name too long (max 255 characters)")]
    NameTooLong,
    #[error("Invalid IP address: {0}")]
    InvalidIp(String),
    #[error("Page must be greater than or equal to 1")]
    InvalidPage,
    #[error("Page size must be between 1 and 100")]
    InvalidPageSize,
}

impl ResourceError {
    /// Name of the input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ResourceError::EmptyName | ResourceError::NameTooLong => "name",
            ResourceError::InvalidIp(_) => "ip",
            ResourceError::InvalidPage => "page",
            ResourceError::InvalidPageSize => "pageSize",
        }
    }
}
