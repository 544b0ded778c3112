use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reconcile heterogeneous order, user, and book-catalog datasets",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full reconciliation pipeline and emit the summary report
    Report(ReportArgs),
    /// Preview cleaned order rows in a formatted table
    Preview(PreviewArgs),
    /// Resolve user identities and print the resulting clusters
    Clusters(ClustersArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Orders CSV input ('-' reads stdin)
    #[arg(long)]
    pub orders: PathBuf,
    /// Users CSV input
    #[arg(long)]
    pub users: PathBuf,
    /// Book catalog YAML input
    #[arg(long)]
    pub books: PathBuf,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Optional CSV artifact with the full daily revenue series
    #[arg(long = "daily-revenue")]
    pub daily_revenue: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the CSV inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Orders CSV input ('-' reads stdin)
    #[arg(long)]
    pub orders: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ClustersArgs {
    /// Users CSV input
    #[arg(long)]
    pub users: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
