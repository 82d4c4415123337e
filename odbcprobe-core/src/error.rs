//! Error types with connection-string sanitization.
//!
//! ODBC connection strings routinely carry credentials in `PWD=` attributes.
//! Every error constructed here takes already-sanitized context, and
//! [`redact_connection_string`] is the single place that masking happens so
//! credentials never reach logs or error output.

use thiserror::Error;

/// Main error type for odbcprobe operations.
///
/// Driver-reported failures keep the underlying [`odbc_api::Error`] as their
/// source so the diagnostic record (state, native code, message) survives to
/// the reporting layer.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Allocating the ODBC environment failed; nothing else can run.
    #[error("ODBC environment allocation failed")]
    Environment {
        /// Driver manager error behind the failed allocation.
        #[source]
        source: odbc_api::Error,
    },

    /// Connecting to a data source failed (target already redacted)
    #[error("connection to {target} failed")]
    Connect {
        /// Redacted form of the target that refused the connection.
        target: String,
        /// Driver error carrying the diagnostic record.
        #[source]
        source: odbc_api::Error,
    },

    /// Direct execution of a SQL statement failed
    #[error("query execution failed: {context}")]
    Query {
        /// What was being executed or fetched.
        context: String,
        /// Driver error carrying the diagnostic record.
        #[source]
        source: odbc_api::Error,
    },

    /// Driver or data-source catalog lookup failed
    #[error("catalog lookup failed: {context}")]
    Catalog {
        /// Which enumeration or lookup failed.
        context: String,
        /// Driver error carrying the diagnostic record.
        #[source]
        source: odbc_api::Error,
    },

    /// Driver information key could not be retrieved
    #[error("driver information lookup failed: {key}")]
    DriverInfo {
        /// The informational key that failed.
        key: &'static str,
        /// Driver error carrying the diagnostic record.
        #[source]
        source: odbc_api::Error,
    },

    /// Writing rendered results to the output stream failed
    #[error("failed to write results: {context}")]
    Io {
        /// The stream that rejected the write.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid target, argument, or logging setup
    #[error("configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration.
        message: String,
    },
}

/// Convenience type alias for Results with [`ProbeError`].
pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// Creates a connection error. `target` must already be redacted.
    pub fn connect(target: impl Into<String>, source: odbc_api::Error) -> Self {
        Self::Connect {
            target: target.into(),
            source,
        }
    }

    /// Creates a query execution error with context.
    pub fn query_failed(context: impl Into<String>, source: odbc_api::Error) -> Self {
        Self::Query {
            context: context.into(),
            source,
        }
    }

    /// Creates a catalog lookup error with context.
    pub fn catalog_failed(context: impl Into<String>, source: odbc_api::Error) -> Self {
        Self::Catalog {
            context: context.into(),
            source,
        }
    }

    /// Creates a rendering I/O error with context.
    pub fn io_failed(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the driver-reported error underlying this failure, if any.
    ///
    /// Used by the diagnostics reporter to print the driver's
    /// (state, native code, message) record alongside our own context.
    pub fn odbc_source(&self) -> Option<&odbc_api::Error> {
        match self {
            Self::Environment { source }
            | Self::Connect { source, .. }
            | Self::Query { source, .. }
            | Self::Catalog { source, .. }
            | Self::DriverInfo { source, .. } => Some(source),
            Self::Io { .. } | Self::Configuration { .. } => None,
        }
    }
}

/// Masks credential attributes in an ODBC connection string.
///
/// Connection strings are `KEY=value;` pairs, not URLs, so this walks the
/// attribute list and replaces the value of any password-carrying key with
/// `****`. All other attributes pass through unchanged.
///
/// # Example
/// ```rust
/// use odbcprobe_core::redact_connection_string;
///
/// let sanitized = redact_connection_string("DSN=test;UID=user;PWD=secret");
/// assert_eq!(sanitized, "DSN=test;UID=user;PWD=****");
/// assert!(!sanitized.contains("secret"));
/// ```
pub fn redact_connection_string(connection_string: &str) -> String {
    connection_string
        .split(';')
        .map(|attribute| match attribute.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}=****"),
            _ => attribute.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.trim();
    key.eq_ignore_ascii_case("pwd") || key.eq_ignore_ascii_case("password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_connection_string() {
        let redacted = redact_connection_string("DSN=MYSQL_TEST;UID=matt;PWD=secret");

        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("PWD=****"));
        assert!(redacted.contains("DSN=MYSQL_TEST"));
        assert!(redacted.contains("UID=matt"));
    }

    #[test]
    fn test_redact_is_case_insensitive() {
        let redacted = redact_connection_string("dsn=test;Password=hunter2");
        assert_eq!(redacted, "dsn=test;Password=****");
    }

    #[test]
    fn test_redact_without_credentials() {
        let redacted = redact_connection_string("DSN=MYSQL_TEST");
        assert_eq!(redacted, "DSN=MYSQL_TEST");
    }

    #[test]
    fn test_redact_preserves_trailing_separator() {
        let redacted = redact_connection_string("DSN=test;PWD=x;");
        assert_eq!(redacted, "DSN=test;PWD=****;");
    }

    #[test]
    fn test_error_creation() {
        let error = ProbeError::configuration("no target given");
        assert!(error.to_string().contains("no target given"));
        assert!(error.odbc_source().is_none());
    }
}
