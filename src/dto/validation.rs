//! Validation helpers for command arguments.

use validator::ValidationError;

/// Shortest team name accepted by `/createteam`, in characters.
pub const MIN_TEAM_NAME_LENGTH: usize = 5;

/// Validates a requested team name: non-empty and at least [`MIN_TEAM_NAME_LENGTH`] characters.
///
/// # Examples
///
/// ```ignore
/// validate_team_name("Foxes") // Ok
/// validate_team_name("Fox")   // Err - too short
/// validate_team_name("")      // Err - empty
/// ```
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    validate_team_name_present(name)?;

    if name.chars().count() < MIN_TEAM_NAME_LENGTH {
        let mut err = ValidationError::new("team_name_length");
        err.message = Some(
            format!("Your team name must have at least {MIN_TEAM_NAME_LENGTH} characters").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a team name argument was supplied at all.
pub fn validate_team_name_present(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        let mut err = ValidationError::new("team_name_empty");
        err.message = Some("You must tell me a non-empty team name".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_name_valid() {
        assert!(validate_team_name("Foxes").is_ok());
        assert!(validate_team_name("The Mighty Badgers").is_ok());
        assert!(validate_team_name("Fuchs-Ü").is_ok());
    }

    #[test]
    fn test_validate_team_name_empty() {
        let err = validate_team_name("").unwrap_err();
        assert_eq!(err.code, "team_name_empty");
        assert!(validate_team_name_present("").is_err());
    }

    #[test]
    fn test_validate_team_name_too_short() {
        let err = validate_team_name("Fox").unwrap_err();
        assert_eq!(err.code, "team_name_length");
        assert!(validate_team_name("abcd").is_err());
        // four characters, eight bytes
        assert!(validate_team_name("ÜÜÜÜ").is_err());
        assert!(validate_team_name_present("Fox").is_ok());
    }
}
