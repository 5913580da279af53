//! Exit status for karmactl.
//!
//! Library errors carry their own code (see `KarmaError::exit_code`);
//! anything else is a general error.

use karma_core::KarmaError;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the payload is not valid JSON
pub const EXIT_INVALID_INPUT: i32 = 65;

/// Exit code for a failed command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(karma) = err.downcast_ref::<KarmaError>() {
        return karma.exit_code();
    }
    if err.downcast_ref::<serde_json::Error>().is_some() {
        return EXIT_INVALID_INPUT;
    }
    EXIT_GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_karma_error_code_survives_context() {
        let err = Err::<(), _>(KarmaError::Preferences("locked".to_string()))
            .context("saving preferences")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), 73);
    }

    #[test]
    fn test_json_error_is_invalid_input() {
        let err: anyhow::Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(exit_code_for(&err), EXIT_INVALID_INPUT);
    }

    #[test]
    fn test_other_errors_are_general() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), EXIT_GENERAL_ERROR);
    }
}
