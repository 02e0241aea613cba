use crate::utils::error::{AdError, Result};
use std::net::SocketAddr;

pub const MAX_TITLE_LENGTH: usize = 255;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Required, non-blank advertisement title. Returns the trimmed value.
pub fn validate_title(title: Option<&str>) -> Result<String> {
    let title = title.ok_or_else(|| AdError::validation("title", "This field is required."))?;
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(AdError::validation("title", "This field may not be blank."));
    }

    let length = trimmed.chars().count();
    if length > MAX_TITLE_LENGTH {
        return Err(AdError::validation(
            "title",
            format!(
                "Ensure this field has no more than {} characters (it has {}).",
                MAX_TITLE_LENGTH, length
            ),
        ));
    }

    Ok(trimmed.to_string())
}

pub fn validate_socket_addr(field_name: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse::<SocketAddr>()
        .map_err(|e| AdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AdError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}
