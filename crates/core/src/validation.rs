//! Input sanitation for positional invocation arguments.

use crate::error::{DomainError, DomainResult};

/// Maximum argument length (in characters) unless configured otherwise.
pub const DEFAULT_MAX_ARGUMENT_LEN: usize = 32;

/// Reject empty arguments and arguments longer than `max_len` characters.
///
/// The first offending argument (by position) determines the error.
pub fn sanitize_arguments<S: AsRef<str>>(args: &[S], max_len: usize) -> DomainResult<()> {
    for (i, arg) in args.iter().enumerate() {
        let arg = arg.as_ref();
        if arg.is_empty() {
            return Err(DomainError::validation(format!(
                "Argument {i} must be a non-empty string"
            )));
        }
        if arg.chars().count() > max_len {
            return Err(DomainError::validation(format!(
                "Argument {i} must be <= {max_len} characters"
            )));
        }
    }
    Ok(())
}
