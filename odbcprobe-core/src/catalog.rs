//! Driver and data-source enumeration.
//!
//! Both listings are environment-scoped: they need no live connection and
//! work even when every configured data source is unreachable. The binding
//! performs the fetch-first/fetch-next iteration; each entry is rendered as
//! one line.

use crate::error::{ProbeError, Result};
use odbc_api::Environment;
use std::fmt;

/// One installed driver, as reported by the driver manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverEntry {
    /// Driver description (its name in the driver manager's configuration).
    pub description: String,
    /// Driver attributes, sorted by key for stable output.
    pub attributes: Vec<(String, String)>,
}

impl fmt::Display for DriverEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    {} - {}", self.description, self.attribute_summary())
    }
}

impl DriverEntry {
    fn attribute_summary(&self) -> String {
        self.attributes
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// One configured data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceEntry {
    /// Data source name to use in `DSN=` connection strings.
    pub name: String,
    /// The driver serving this data source.
    pub driver: String,
}

impl fmt::Display for DataSourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    {} - {}", self.name, self.driver)
    }
}

/// Enumerates the drivers installed in the driver manager.
///
/// # Errors
/// Returns [`ProbeError::Catalog`] if the driver manager rejects the
/// enumeration.
pub fn installed_drivers(environment: &Environment) -> Result<Vec<DriverEntry>> {
    let drivers = environment
        .drivers()
        .map_err(|source| ProbeError::catalog_failed("driver enumeration", source))?;

    Ok(drivers
        .into_iter()
        .map(|driver| {
            let mut attributes: Vec<(String, String)> = driver.attributes.into_iter().collect();
            attributes.sort();
            DriverEntry {
                description: driver.description,
                attributes,
            }
        })
        .collect())
}

/// Enumerates the data sources configured for the current user and system.
///
/// # Errors
/// Returns [`ProbeError::Catalog`] if the driver manager rejects the
/// enumeration.
pub fn configured_data_sources(environment: &Environment) -> Result<Vec<DataSourceEntry>> {
    let sources = environment
        .data_sources()
        .map_err(|source| ProbeError::catalog_failed("data source enumeration", source))?;

    Ok(sources
        .into_iter()
        .map(|source| DataSourceEntry {
            name: source.server_name,
            driver: source.driver,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_entry_line() {
        let entry = DriverEntry {
            description: "MySQL ODBC 8.0 Driver".into(),
            attributes: vec![
                ("Driver".into(), "libmyodbc8w.so".into()),
                ("UsageCount".into(), "1".into()),
            ],
        };
        assert_eq!(
            entry.to_string(),
            "    MySQL ODBC 8.0 Driver - Driver=libmyodbc8w.so;UsageCount=1"
        );
    }

    #[test]
    fn test_driver_entry_without_attributes() {
        let entry = DriverEntry {
            description: "SQLite3".into(),
            attributes: vec![],
        };
        assert_eq!(entry.to_string(), "    SQLite3 - ");
    }

    #[test]
    fn test_data_source_entry_line() {
        let entry = DataSourceEntry {
            name: "MYSQL_TEST".into(),
            driver: "MySQL ODBC 8.0 Driver".into(),
        };
        assert_eq!(entry.to_string(), "    MYSQL_TEST - MySQL ODBC 8.0 Driver");
    }
}
