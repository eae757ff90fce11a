use crate::error::ApiError;

pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::BadRequest(format!(
            "{field} must be between {min} and {max} characters (got {len})"
        )));
    }
    Ok(())
}

/// The derived repository name must be non-empty and not a path component.
/// Character normalisation is left to the source host.
pub fn check_repo_name(value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "task must produce a non-empty repository name".into(),
        ));
    }
    if value == "." || value == ".." {
        return Err(ApiError::BadRequest("repository name must not be '.' or '..'".into()));
    }
    Ok(())
}

pub fn check_callback_url(value: &str) -> Result<(), ApiError> {
    check_length("evaluation_url", value, 1, 2048)?;
    let parsed = url::Url::parse(value)
        .map_err(|_| ApiError::BadRequest("evaluation_url is not a valid URL".into()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::BadRequest(
            "evaluation_url must use http or https scheme".into(),
        ));
    }
    if parsed.host_str().is_none() {
        return Err(ApiError::BadRequest("evaluation_url must have a host".into()));
    }
    Ok(())
}
