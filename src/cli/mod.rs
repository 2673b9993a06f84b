// CLI Layer
// 対話入力の受付とモードごとのコマンド実行

pub mod commands;
pub mod prompt;
pub mod session;

use clap::Parser;

/// dbcompare - Database Data & Schema Comparison Tool
///
/// Compares table schemas or column data between two databases.
/// All parameters are entered interactively.
#[derive(Parser, Debug)]
#[command(name = "dbcompare")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive data and schema comparison between two databases")]
#[command(long_about = "dbcompare - Database Data & Schema Comparison Tool

Connects to two databases (DB1 and DB2) and reports differences:
  • Schemas of all tables (column names and declared types)
  • Schema of a single table
  • Values of one column, matched row by row on a key column

Supported databases: PostgreSQL, MySQL, SQLite")]
#[command(after_help = "EXIT CODES:
  0  Comparison completed
  1  Invalid menu choice, output file error or closed input
  2  Connection failure
  3  Query failure

Set RUST_LOG=debug to see diagnostic logs on stderr.")]
pub struct Cli {}
