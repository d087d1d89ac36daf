mod error;
mod operations;
mod requests;
mod types;

pub use error::ResourceError;
pub use operations::{
    name_matches_filter, page_count, page_offset, validate_page_request, validate_resource_input,
    DEFAULT_PAGE_SIZE, MAX_NAME_LENGTH, MAX_PAGE_SIZE,
};
pub use requests::{CreateResourceRequest, ListResourcesQuery, UpdateResourceRequest};
pub use types::{Pagination, Resource, ResourceEvent, ResourceInput, ResourcePage};
