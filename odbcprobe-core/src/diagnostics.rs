//! Diagnostics reporting for failed driver calls.
//!
//! A non-successful ODBC call carries a diagnostic record: a five-character
//! SQLSTATE, a driver-native error code, and a message. The binding embeds
//! that record in its error value; this module prints it to the error
//! stream next to our own context, without aborting anything. Additional
//! records behind the first, and the truncation notes emitted on "success
//! with info" returns, arrive through the binding's `log` output and are
//! captured by the subscriber's bridge.

use crate::error::ProbeError;
use tracing::error;

/// Reports a failed operation and the driver diagnostics behind it.
///
/// Logs our error chain first, then the driver-supplied record
/// (state, native code, message) when one exists. Never panics, never
/// returns an error; callers use it to log-and-continue.
pub fn report(operation: &str, error: &ProbeError) {
    error!(operation, "{error}");
    if let Some(driver_error) = error.odbc_source() {
        error!(operation, "driver diagnostics: {driver_error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_driver_source_does_not_panic() {
        let error = ProbeError::configuration("bad target");
        report("connect", &error);
    }
}
