//! Inspection helpers over `psql`
//!
//! Queries run as one-shot CLI invocations against a database URL; no
//! connection pooling, no driver. `ON_ERROR_STOP` makes SQL errors surface
//! as non-zero exits instead of ignored notices.

use crate::config::DbConfig;
use crate::db::runner::{require_tool, run_cli, DEFAULT_CLI_TIMEOUT};
use crate::DbResult;

pub(crate) const PSQL_HINT: &str =
    "Install the Postgres client, e.g. `sudo apt install postgresql-client`";

const LIST_TABLES_SQL: &str =
    "SELECT table_name FROM information_schema.tables WHERE table_schema = 'public';";

/// Runs a SQL statement, returning psql's stdout
pub async fn run_sql(config: &DbConfig, db_url: &str, sql: &str) -> DbResult<String> {
    psql(config, db_url, &[], sql).await
}

/// Lists the tables in the public schema
pub async fn list_tables(config: &DbConfig, db_url: &str) -> DbResult<Vec<String>> {
    let stdout = psql(config, db_url, &["-t", "-A"], LIST_TABLES_SQL).await?;
    Ok(parse_table_list(&stdout))
}

/// Describes a table's columns: name, type, default, nullability
pub async fn column_details(config: &DbConfig, db_url: &str, table: &str) -> DbResult<String> {
    // Single quotes doubled so the table name stays one SQL literal
    let sql = format!(
        "SELECT column_name, data_type, column_default, is_nullable \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = '{}';",
        table.replace('\'', "''")
    );
    psql(config, db_url, &[], &sql).await
}

async fn psql(
    config: &DbConfig,
    db_url: &str,
    extra_args: &[&str],
    sql: &str,
) -> DbResult<String> {
    let cli = require_tool(&config.psql_cli, PSQL_HINT)?;

    let mut args = vec![db_url, "-v", "ON_ERROR_STOP=1"];
    args.extend_from_slice(extra_args);
    args.extend_from_slice(&["-c", sql]);

    let output = run_cli(&cli, &args, None, None, DEFAULT_CLI_TIMEOUT).await?;
    match output.require_success() {
        Ok(stdout) => Ok(stdout.to_string()),
        Err(error) => {
            tracing::error!(error = %crate::format_error(&error), "psql invocation failed");
            Err(error)
        }
    }
}

/// Parses `-t -A` (tuples-only, unaligned) output into table names
fn parse_table_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_list() {
        let stdout = "listings\nprices\n\nreviews\n";
        assert_eq!(parse_table_list(stdout), vec!["listings", "prices", "reviews"]);
    }

    #[test]
    fn test_parse_table_list_empty() {
        assert!(parse_table_list("\n\n").is_empty());
    }
}
