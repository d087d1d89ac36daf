use std::net::IpAddr;

use super::error::ResourceError;
use super::types::ResourceInput;

/// Longest accepted resource name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Page size used when a listing does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a listing may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validates a resource before creation or update.
///
/// The name must contain something other than whitespace and the ip must
/// parse as an IPv4 or IPv6 address.
pub fn validate_resource_input(input: &ResourceInput) -> Result<(), ResourceError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ResourceError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ResourceError::NameTooLong);
    }
    if input.ip.trim().parse::<IpAddr>().is_err() {
        return Err(ResourceError::InvalidIp(input.ip.clone()));
    }
    Ok(())
}

/// Validates 1-based listing parameters.
pub fn validate_page_request(page: u32, page_size: u32) -> Result<(), ResourceError> {
    if page == 0 {
        return Err(ResourceError::InvalidPage);
    }
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ResourceError::InvalidPageSize);
    }
    Ok(())
}

/// Converts a 1-based page number into a row offset.
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}

/// Number of pages needed to show `amount` rows, `page_size` at a time.
pub fn page_count(amount: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    amount.div_ceil(u64::from(page_size))
}

/// Case-insensitive substring match used to filter listings by name.
///
/// An empty filter matches every name.
pub fn name_matches_filter(name: &str, filter: &str) -> bool {
    filter.is_empty() || name.to_lowercase().contains(&filter.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_resource_input_valid() {
        assert!(validate_resource_input(&ResourceInput::new("A", "10.0.0.1")).is_ok());
        assert!(validate_resource_input(&ResourceInput::new("db", "::1")).is_ok());
        let link_local = ResourceInput::new("db", "fe80::1ff:fe23:4567:890a");
        assert!(validate_resource_input(&link_local).is_ok());
    }

    #[test]
    fn test_validate_resource_input_empty_name() {
        assert_eq!(
            validate_resource_input(&ResourceInput::new("   ", "10.0.0.1")),
            Err(ResourceError::EmptyName)
        );
    }

    #[test]
    fn test_validate_resource_input_name_too_long() {
        let name = "n".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(
            validate_resource_input(&ResourceInput::new(name, "10.0.0.1")),
            Err(ResourceError::NameTooLong)
        );
    }

    #[test]
    fn test_validate_resource_input_invalid_ip() {
        for ip in ["", "10.0.0", "256.0.0.1", "localhost"] {
            assert_eq!(
                validate_resource_input(&ResourceInput::new("host", ip)),
                Err(ResourceError::InvalidIp(ip.to_string())),
                "{ip}"
            );
        }
    }

    #[test]
    fn test_validate_page_request() {
        assert!(validate_page_request(1, 10).is_ok());
        assert!(validate_page_request(9, MAX_PAGE_SIZE).is_ok());
        assert_eq!(validate_page_request(0, 10), Err(ResourceError::InvalidPage));
        assert_eq!(validate_page_request(1, 0), Err(ResourceError::InvalidPageSize));
        assert_eq!(
            validate_page_request(1, MAX_PAGE_SIZE + 1),
            Err(ResourceError::InvalidPageSize)
        );
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
        assert_eq!(page_offset(0, 10), 0);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_name_matches_filter() {
        assert!(name_matches_filter("Edge-Router", ""));
        assert!(name_matches_filter("Edge-Router", "router"));
        assert!(name_matches_filter("Edge-Router", "GE-R"));
        assert!(!name_matches_filter("Edge-Router", "switch"));
    }
}
