//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;
use pagination::{PageRequest, PageRequestError};

/// Parse a path or body UUID with a field-scoped error.
pub(crate) fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| {
        Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
            "field": field,
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

/// Validate pager query parameters.
pub(crate) fn page_request(page: u32, number_of_items: u32) -> Result<PageRequest, Error> {
    PageRequest::new(page, number_of_items).map_err(|error| {
        let field = match error {
            PageRequestError::ZeroPage => "page",
            PageRequestError::ZeroPageSize | PageRequestError::PageSizeTooLarge => "numberOfItems",
        };
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": field,
            "code": "invalid_page",
        }))
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::{page_request, parse_uuid};
    use crate::domain::ErrorCode;

    #[test]
    fn uuids_parse_with_field_context() {
        assert!(parse_uuid("tutorId", "123e4567-e89b-12d3-a456-426614174000").is_ok());

        let error = parse_uuid("tutorId", "nope").expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "tutorId");
    }

    #[test]
    fn page_bounds_are_enforced() {
        assert!(page_request(1, 10).is_ok());
        assert!(page_request(0, 10).is_err());
        assert!(page_request(1, 0).is_err());
        assert!(page_request(1, 1000).is_err());
    }
}
