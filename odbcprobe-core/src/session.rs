//! Session handling for one live data-source connection.
//!
//! The original procedural pattern for this kind of client is a pair of
//! global environment/connection handles with manual allocate/free calls.
//! Here a [`Session`] owns its connection and borrows the environment, so
//! the strict nesting lifetime (statement ⊂ connection ⊂ environment) is
//! checked by the compiler and release happens on every exit path,
//! including early failure. Releasing handles never reports errors;
//! failures during drop are ignored.

use crate::error::{ProbeError, Result, redact_connection_string};
use crate::getinfo;
use crate::target::ProbeTarget;
use odbc_api::handles::OutputStringBuffer;
use odbc_api::sys::InfoType;
use odbc_api::{Cursor, DriverCompleteOption, Environment, ResultSetMetadata};
use std::fmt;
use std::num::NonZeroU16;
use tracing::{debug, warn};

/// Capacity for the completed connection string the driver hands back.
const COMPLETED_CONNECTION_STRING_CAPACITY: usize = 1024;

/// Allocates the ODBC environment.
///
/// Must be called once, before any connection is opened; the binding
/// requests ODBC 3 behavior on it. Every [`Session`] borrows the returned
/// environment, which is therefore destroyed last.
///
/// # Errors
/// Returns [`ProbeError::Environment`] if the driver manager refuses the
/// allocation; nothing else can run in that case.
pub fn create_environment() -> Result<Environment> {
    Environment::new().map_err(|source| ProbeError::Environment { source })
}

/// One live connection to a data source.
///
/// Created by [`Session::connect`], dropped to disconnect. Statements are
/// ephemeral: each query or catalog lookup returns a forward-only cursor
/// that borrows the session and is consumed exactly once.
pub struct Session<'env> {
    connection: odbc_api::Connection<'env>,
    completed_connection_string: String,
}

impl<'env> Session<'env> {
    /// Opens a connection to the given target.
    ///
    /// Driver completion runs in `NoPrompt` mode: this is a headless CLI,
    /// so a connection string the driver considers incomplete fails instead
    /// of opening a dialog. The completed connection string returned by the
    /// driver is captured for inspection.
    ///
    /// # Errors
    /// Returns [`ProbeError::Connect`] with the driver's diagnostic record
    /// as source. The caller decides whether that is fatal; the probe
    /// sequence treats it as a logged skip.
    pub fn connect(environment: &'env Environment, target: &ProbeTarget) -> Result<Self> {
        let connection_string = target.connection_string();
        debug!("connecting to {target}");

        let mut completed =
            OutputStringBuffer::with_buffer_size(COMPLETED_CONNECTION_STRING_CAPACITY);
        let connection = environment
            .driver_connect(
                &connection_string,
                &mut completed,
                DriverCompleteOption::NoPrompt,
            )
            .map_err(|source| ProbeError::connect(target.redacted(), source))?;

        if completed.is_truncated() {
            warn!("completed connection string was truncated by the driver");
        }

        Ok(Self {
            connection,
            completed_connection_string: completed.to_utf8(),
        })
    }

    /// The completed connection string the driver returned on connect,
    /// with credential attributes masked.
    pub fn completed_connection_string(&self) -> String {
        redact_connection_string(&self.completed_connection_string)
    }

    /// Queries the fixed informational keys reported by the probe: DBMS
    /// product name and version, the concurrent-statement limit, and the
    /// column-retrieval ordering capabilities of `SQLGetData`.
    ///
    /// Only the product name lookup can fail; the remaining keys go
    /// through raw `SQLGetInfo` calls whose non-success collapses into the
    /// undefined sentinel, the same way the classic diagnostic clients
    /// ignore these return codes.
    ///
    /// # Errors
    /// Returns [`ProbeError::DriverInfo`] naming the key that failed.
    pub fn driver_information(&self) -> Result<DriverInformation> {
        let dbms_name = self
            .connection
            .database_management_system_name()
            .map_err(|source| ProbeError::DriverInfo {
                key: "DBMS name",
                source,
            })?;

        let handle = self.connection.as_sys();

        Ok(DriverInformation {
            dbms_name,
            dbms_version: getinfo::info_string(handle, InfoType::DbmsVer),
            // 0 means "no limit or undefined"; a failed lookup lands there too.
            max_concurrent_statements: getinfo::info_u16(handle, InfoType::MaxConcurrentActivities)
                .and_then(NonZeroU16::new),
            get_data_support: getinfo::info_u32(handle, InfoType::GetDataExtensions)
                .map(GetDataSupport::from_bitmask),
        })
    }

    /// Looks up all catalog entries of kind `TABLE` for this connection.
    ///
    /// Returns a forward-only cursor over the driver's table catalog,
    /// rendered by the shared result printer like any other result set.
    ///
    /// # Errors
    /// Returns [`ProbeError::Catalog`] if the lookup fails.
    pub fn tables(&self) -> Result<impl Cursor + ResultSetMetadata> {
        self.connection
            .tables("", "", "", "TABLE")
            .map_err(|source| ProbeError::catalog_failed("table listing", source))
    }

    /// Executes literal SQL text directly, without parameter binding or
    /// prepared-statement reuse.
    ///
    /// Returns `None` for statements that produce no result set. The cursor
    /// borrows the session; dropping it releases the statement immediately.
    ///
    /// # Errors
    /// Returns [`ProbeError::Query`] carrying the driver's diagnostics.
    pub fn execute(&self, sql: &str) -> Result<Option<impl Cursor + ResultSetMetadata>> {
        self.connection
            .execute(sql, (), None)
            .map_err(|source| ProbeError::query_failed(format!("executing `{sql}`"), source))
    }
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field(
                "completed_connection_string",
                &self.completed_connection_string(),
            )
            .finish()
    }
}

// SQL_GETDATA_EXTENSIONS bits the probe reports.
const GD_ANY_COLUMN: u32 = 0x0000_0001;
const GD_ANY_ORDER: u32 = 0x0000_0002;

/// Column-retrieval ordering capabilities of `SQLGetData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetDataSupport {
    /// Columns may be retrieved in any order.
    pub any_order: bool,
    /// Columns before the last bound one may be retrieved.
    pub any_column: bool,
}

impl GetDataSupport {
    fn from_bitmask(mask: u32) -> Self {
        Self {
            any_order: mask & GD_ANY_ORDER != 0,
            any_column: mask & GD_ANY_COLUMN != 0,
        }
    }
}

/// The informational keys the probe reports about the connected driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInformation {
    /// DBMS product name behind the connection.
    pub dbms_name: String,
    /// DBMS product version; `None` if the driver did not report one.
    pub dbms_version: Option<String>,
    /// Concurrent-statement limit; `None` means no limit or undefined.
    pub max_concurrent_statements: Option<NonZeroU16>,
    /// `SQLGetData` ordering capabilities; `None` if not reported.
    pub get_data_support: Option<GetDataSupport>,
}

impl fmt::Display for DriverInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Driver Information:")?;
        writeln!(f, "    DBMS Name: {}", self.dbms_name)?;
        match &self.dbms_version {
            Some(version) => writeln!(f, "    DBMS Version: {version}")?,
            None => writeln!(f, "    DBMS Version: not reported")?,
        }
        match self.max_concurrent_statements {
            Some(limit) => writeln!(f, "    Max concurrent statements = {limit}")?,
            None => writeln!(f, "    Max concurrent statements - no limit or undefined")?,
        }
        match self.get_data_support {
            Some(support) => {
                if support.any_order {
                    writeln!(f, "    SQLGetData - columns can be retrieved in any order")?;
                } else {
                    writeln!(f, "    SQLGetData - columns must be retrieved in order")?;
                }
                if support.any_column {
                    write!(f, "    SQLGetData - can retrieve columns before the last bound one")
                } else {
                    write!(
                        f,
                        "    SQLGetData - columns must be retrieved after the last bound one"
                    )
                }
            }
            None => write!(f, "    SQLGetData - capabilities not reported"),
        }
    }
}
