use super::ApiError;
use crate::models::course::LECTURE_KINDS;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 100;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }

    if value.len() > 500 {
        return Err(ApiError::validation(format!(
            "{field} must be 500 characters or less"
        )));
    }

    Ok(())
}

pub fn validate_lecture_kind(kind: &str) -> Result<(), ApiError> {
    if LECTURE_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Invalid lecture type '{kind}'. Expected one of: {}",
            LECTURE_KINDS.join(", ")
        )))
    }
}

/// Optional search text from a request. Only length is checked: an empty
/// query is valid and means "derive it from the owner".
pub fn validate_search_query(query: Option<&str>) -> Result<Option<&str>, ApiError> {
    if let Some(q) = query
        && q.len() > 500
    {
        return Err(ApiError::validation(
            "Search query must be 500 characters or less",
        ));
    }
    Ok(query)
}
