// Validation utilities module
// Custom validation functions for domain-specific request fields

use validator::ValidationError;

/// Validates a wall-clock time string in `HH:MM` form (00:00 - 23:59).
/// Slot labels are built from these, so malformed input would otherwise
/// leak into booking codes and slot lookups.
pub fn validate_wall_clock(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(ValidationError::new("invalid_time_format"));
    }

    let hours: u32 = match value[..2].parse() {
        Ok(h) => h,
        Err(_) => return Err(ValidationError::new("invalid_time_format")),
    };
    let minutes: u32 = match value[3..].parse() {
        Ok(m) => m,
        Err(_) => return Err(ValidationError::new("invalid_time_format")),
    };

    if hours > 23 || minutes > 59 {
        return Err(ValidationError::new("time_out_of_range"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_times() {
        assert!(validate_wall_clock("08:00").is_ok());
        assert!(validate_wall_clock("13:45").is_ok());
        assert!(validate_wall_clock("00:00").is_ok());
        assert!(validate_wall_clock("23:59").is_ok());
    }

    #[test]
    fn test_rejects_malformed_times() {
        assert!(validate_wall_clock("8:00").is_err());
        assert!(validate_wall_clock("08-00").is_err());
        assert!(validate_wall_clock("0800").is_err());
        assert!(validate_wall_clock("ab:cd").is_err());
        assert!(validate_wall_clock("").is_err());
    }

    #[test]
    fn test_rejects_out_of_range_times() {
        assert!(validate_wall_clock("24:00").is_err());
        assert!(validate_wall_clock("12:60").is_err());
    }
}
