//! Tracing and logging (shared setup for the ledger binaries).

/// Initialize process-wide tracing with the format taken from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    crate::tracing::init(crate::tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
