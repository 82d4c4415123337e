//! ODBC diagnostic client.
//!
//! Connects to a data source through the driver manager, enumerates
//! installed drivers and configured data sources, reports driver
//! information, lists tables, and executes ad-hoc SQL, streaming every
//! result set to stdout. Logging and failure notices go to stderr.
//!
//! The default invocation runs the full probe sequence and always runs to
//! completion: a failed step is reported with its driver diagnostics and
//! the remaining steps still execute. The single-operation subcommands
//! report failure through the exit code instead, so they compose in
//! scripts.

use clap::{Args, Parser, Subcommand};
use odbcprobe_core::{
    Environment, ProbeError, ProbeTarget, Session, catalog, create_environment, diagnostics,
    init_logging, render,
};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "odbcprobe")]
#[command(about = "ODBC driver and data source diagnostic client")]
#[command(version)]
#[command(long_about = "
odbcprobe - ODBC driver and data source diagnostics

Without a subcommand this runs the full probe sequence against the given
target: connect, enumerate drivers, enumerate data sources, report driver
information, list tables, then execute any --query statements in order.
Failed steps are reported on stderr and the sequence keeps going.

TARGETS:
  MYSQL_TEST                        a configured data source name
  DSN=MYSQL_TEST;UID=user;PWD=pass  a full ODBC connection string

EXAMPLES:
  odbcprobe MYSQL_TEST
  odbcprobe probe MYSQL_TEST \\
      --query 'select * from junk' \\
      --query 'select count(*), sum(a) from junk' \\
      --query 'select a, a+3, 3.141592654 from junk' \\
      --query 'select j1.a, j2.a from junk j1 natural join junk j2'
  odbcprobe drivers
  odbcprobe tables MYSQL_TEST
  odbcprobe query 'select 1' MYSQL_TEST
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Command>,

    /// Data source name or ODBC connection string
    #[arg(
        env = "ODBC_TARGET",
        help = "DSN name or connection string (credentials are redacted in logs)"
    )]
    target: Option<String>,

    /// SQL statements to execute after the catalog steps
    #[arg(long, value_name = "SQL", help = "Statement to execute (repeatable)")]
    query: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full probe sequence against a target
    Probe(ProbeArgs),
    /// List drivers installed in the driver manager
    Drivers,
    /// List configured data sources
    DataSources,
    /// Report driver information for a target
    Info(TargetArgs),
    /// List tables visible through a target
    Tables(TargetArgs),
    /// Execute one SQL statement and print its result set
    Query(QueryArgs),
}

#[derive(Args)]
struct ProbeArgs {
    /// Data source name or ODBC connection string
    target: String,

    /// SQL statements to execute after the catalog steps
    #[arg(long, value_name = "SQL")]
    query: Vec<String>,
}

#[derive(Args)]
struct TargetArgs {
    /// Data source name or ODBC connection string
    #[arg(env = "ODBC_TARGET")]
    target: Option<String>,
}

#[derive(Args)]
struct QueryArgs {
    /// SQL statement to execute
    sql: String,

    /// Data source name or ODBC connection string
    #[arg(env = "ODBC_TARGET")]
    target: Option<String>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all logging except errors")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let environment = create_environment()?;

    match &cli.command {
        Some(Command::Probe(args)) => {
            let target = ProbeTarget::parse(&args.target)?;
            run_probe(&environment, &target, &args.query);
            Ok(())
        }
        Some(Command::Drivers) => Ok(list_drivers(&environment)?),
        Some(Command::DataSources) => Ok(list_data_sources(&environment)?),
        Some(Command::Info(args)) => {
            let session = open_session(&environment, args.target.as_deref())?;
            Ok(show_driver_information(&session)?)
        }
        Some(Command::Tables(args)) => {
            let session = open_session(&environment, args.target.as_deref())?;
            Ok(list_tables(&session)?)
        }
        Some(Command::Query(args)) => {
            let session = open_session(&environment, args.target.as_deref())?;
            Ok(run_query(&session, &args.sql)?)
        }
        None => {
            let target = resolve_target(cli.target.as_deref())?;
            run_probe(&environment, &target, &cli.query);
            Ok(())
        }
    }
}

/// Turns an optional CLI argument into a probe target.
fn resolve_target(target: Option<&str>) -> odbcprobe_core::Result<ProbeTarget> {
    match target {
        Some(target) => ProbeTarget::parse(target),
        None => Err(ProbeError::configuration(
            "no target given; pass a DSN name or connection string, or set ODBC_TARGET",
        )),
    }
}

/// Resolves a target and connects to it, for the single-operation commands.
fn open_session<'env>(
    environment: &'env Environment,
    target: Option<&str>,
) -> odbcprobe_core::Result<Session<'env>> {
    let target = resolve_target(target)?;
    let session = Session::connect(environment, &target)?;
    debug!(
        "connected, completed connection string: {}",
        session.completed_connection_string()
    );
    Ok(session)
}

/// Runs the full linear probe sequence.
///
/// Every step is attempted; failures are reported with their driver
/// diagnostics and never abort the run. Disconnect is implicit when the
/// session drops at the end of this function.
fn run_probe(environment: &Environment, target: &ProbeTarget, queries: &[String]) {
    info!("probing {target}");

    let session = match Session::connect(environment, target) {
        Ok(session) => {
            println!("Connected");
            println!(
                "    Completed connection string: {}",
                session.completed_connection_string()
            );
            println!();
            Some(session)
        }
        Err(error) => {
            diagnostics::report("connect", &error);
            None
        }
    };

    if let Err(error) = list_drivers(environment) {
        diagnostics::report("driver enumeration", &error);
    }
    if let Err(error) = list_data_sources(environment) {
        diagnostics::report("data source enumeration", &error);
    }

    match &session {
        Some(session) => {
            if let Err(error) = show_driver_information(session) {
                diagnostics::report("driver information", &error);
            }
            if let Err(error) = list_tables(session) {
                diagnostics::report("table listing", &error);
            }
            for sql in queries {
                if let Err(error) = run_query(session, sql) {
                    diagnostics::report("query execution", &error);
                }
            }
        }
        None => info!("no active session; skipping connection-scoped steps"),
    }
}

/// Prints one line per installed driver.
fn list_drivers(environment: &Environment) -> odbcprobe_core::Result<()> {
    let drivers = catalog::installed_drivers(environment)?;
    println!("Drivers:");
    for driver in &drivers {
        println!("{driver}");
    }
    println!();
    debug!("listed {} drivers", drivers.len());
    Ok(())
}

/// Prints one line per configured data source.
fn list_data_sources(environment: &Environment) -> odbcprobe_core::Result<()> {
    let sources = catalog::configured_data_sources(environment)?;
    println!("Data Sources:");
    for source in &sources {
        println!("{source}");
    }
    println!();
    debug!("listed {} data sources", sources.len());
    Ok(())
}

/// Prints the driver information block for the live session.
fn show_driver_information(session: &Session<'_>) -> odbcprobe_core::Result<()> {
    let information = session.driver_information()?;
    println!("{information}");
    println!();
    Ok(())
}

/// Renders the table catalog through the shared result printer.
fn list_tables(session: &Session<'_>) -> odbcprobe_core::Result<()> {
    println!("Tables:");
    let cursor = session.tables()?;
    let summary = render::print_result_set(cursor, &mut std::io::stdout().lock())?;
    debug!("table listing produced {} rows", summary.rows);
    Ok(())
}

/// Executes one statement and renders its result set, if it produced one.
fn run_query(session: &Session<'_>, sql: &str) -> odbcprobe_core::Result<()> {
    println!("Query: {sql}");
    match session.execute(sql)? {
        Some(cursor) => {
            let summary = render::print_result_set(cursor, &mut std::io::stdout().lock())?;
            debug!(
                "query produced {} rows of {} columns",
                summary.rows, summary.columns
            );
        }
        None => {
            println!("  (statement produced no result set)");
            println!();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_invocation_takes_target_and_queries() {
        let cli = Cli::try_parse_from([
            "odbcprobe",
            "MYSQL_TEST",
            "--query",
            "select * from junk",
            "--query",
            "select count(*), sum(a) from junk",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.target.as_deref(), Some("MYSQL_TEST"));
        assert_eq!(cli.query.len(), 2);
    }

    #[test]
    fn test_probe_subcommand_requires_target() {
        assert!(Cli::try_parse_from(["odbcprobe", "probe"]).is_err());
    }

    #[test]
    fn test_query_subcommand_parses_sql() {
        let cli = Cli::try_parse_from(["odbcprobe", "query", "select 1", "MYSQL_TEST"]).unwrap();
        match cli.command {
            Some(Command::Query(args)) => {
                assert_eq!(args.sql, "select 1");
                assert_eq!(args.target.as_deref(), Some("MYSQL_TEST"));
            }
            _ => panic!("expected query subcommand"),
        }
    }

    #[test]
    fn test_verbosity_flags_accumulate() {
        let cli = Cli::try_parse_from(["odbcprobe", "-vv", "drivers"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert!(!cli.global.quiet);
    }

    #[test]
    fn test_resolve_target_without_input_fails() {
        assert!(resolve_target(None).is_err());
        assert!(resolve_target(Some("MYSQL_TEST")).is_ok());
    }
}
