pub mod cart_service;
pub mod catalog_service;
pub mod favorites_service;
pub mod order_service;

use crate::domain::errors::DomainError;

/// How many times a read-modify-write is attempted before a version conflict
/// is reported to the caller.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Run `op` again while it fails with `DomainError::Conflict`.
pub(crate) fn retry_on_conflict<T, F>(what: &str, mut op: F) -> Result<T, DomainError>
where
    F: FnMut() -> Result<T, DomainError>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Err(e) if e.is_conflict() && attempt < MAX_WRITE_ATTEMPTS => {
                log::warn!("{what}: concurrent update, retrying (attempt {attempt})");
                attempt += 1;
            }
            other => return other,
        }
    }
}

pub(crate) fn require_id(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), DomainError> = retry_on_conflict("test", || {
            calls += 1;
            Err(DomainError::Conflict("cart".to_string()))
        });
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(calls, MAX_WRITE_ATTEMPTS);
    }

    #[test]
    fn retry_does_not_repeat_other_errors() {
        let mut calls = 0;
        let result: Result<(), DomainError> = retry_on_conflict("test", || {
            calls += 1;
            Err(DomainError::Internal("db down".to_string()))
        });
        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn retry_returns_first_success() {
        let mut calls = 0;
        let result = retry_on_conflict("test", || {
            calls += 1;
            if calls < 2 {
                Err(DomainError::Conflict("cart".to_string()))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(require_id("  ", "session_id").is_err());
        assert!(require_id("abc", "session_id").is_ok());
    }
}
