//! Connection target parsing.
//!
//! A probe target is either a bare data source name (a DSN configured in the
//! driver manager) or a full ODBC connection string. Bare names are expanded
//! to `DSN=<name>` before connecting.
//!
//! # Target Formats
//! - `MYSQL_TEST` - a configured DSN
//! - `DSN=MYSQL_TEST;UID=user;PWD=pass` - an explicit connection string
//! - `Driver={SQLite3};Database=/tmp/probe.db` - a DSN-less connection

use crate::error::{ProbeError, Result, redact_connection_string};
use std::fmt;

/// The data source a probe run connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeTarget {
    /// A pre-configured data source name.
    DataSourceName(String),
    /// A complete ODBC connection string.
    ConnectionString(String),
}

impl ProbeTarget {
    /// Parses a target from user input.
    ///
    /// Anything containing `=` is treated as a connection string; everything
    /// else is taken as a DSN name.
    ///
    /// # Errors
    /// Returns a configuration error for an empty target.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ProbeError::configuration(
                "target must be a DSN name or an ODBC connection string",
            ));
        }
        if input.contains('=') {
            Ok(Self::ConnectionString(input.to_string()))
        } else {
            Ok(Self::DataSourceName(input.to_string()))
        }
    }

    /// Returns the ODBC connection string for this target.
    pub fn connection_string(&self) -> String {
        match self {
            Self::DataSourceName(name) => format!("DSN={name}"),
            Self::ConnectionString(connection_string) => connection_string.clone(),
        }
    }

    /// Returns a credential-free form suitable for logs and error messages.
    pub fn redacted(&self) -> String {
        redact_connection_string(&self.connection_string())
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}
