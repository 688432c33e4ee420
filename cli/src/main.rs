//! Ddlink CLI
//!
//! Command-line interface for converting Datadog deep links between
//! structured JSON files and the URLs the Datadog web UI understands.
//!
//! # Usage
//!
//! ```bash
//! ddlink links build --filename link.json
//! ddlink links parse --url "https://acme.datadoghq.com/logs?query=status%3Aerror"
//! ddlink logs query-to-url --query '{"query": "status:error"}' --duration 24h
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::codec::{logs_url_from_params, DecodedLink, LinkCodec};
use shared::time::{parse_duration, range_ending_at, RelativeTimeResolver, TimeRange};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default chrono layout for `--end-time` values, e.g. `2024-12-06 15:40 -0800`.
const DEFAULT_LAYOUT: &str = "%Y-%m-%d %H:%M %z";

/// Ddlink CLI - Datadog deep-link codec command-line interface
#[derive(Parser)]
#[command(name = "ddlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert link files to URLs and back
    #[command(subcommand)]
    Links(LinksCommand),
    /// Logs-explorer helpers
    #[command(subcommand)]
    Logs(LogsCommand),
}

#[derive(Subcommand)]
enum LinksCommand {
    /// Encode a link file into a Datadog URL
    Build {
        /// Path to the JSON file containing the link
        #[arg(short = 'f', long)]
        filename: PathBuf,
    },
    /// Decode a Datadog URL into a structured link
    Parse {
        /// The URL to parse
        #[arg(short = 'u', long)]
        url: String,

        /// File to write the link to; written to stdout when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LogsCommand {
    /// Build a logs-explorer URL from raw query parameters
    QueryToUrl {
        /// The query parameters as an inline JSON object
        #[arg(long)]
        query: Option<String>,

        /// A file containing the query parameters as a JSON object
        #[arg(long)]
        query_file: Option<PathBuf>,

        /// The base URL of your Datadog site, e.g. https://acme.datadoghq.com
        #[arg(long, env = "DDLINK_BASE_URL")]
        base_url: String,

        /// The duration covered by the query
        #[arg(short = 'd', long, default_value = "24h")]
        duration: String,

        /// The end time of the query; defaults to now
        #[arg(short = 't', long)]
        end_time: Option<String>,

        /// Layout for parsing --end-time
        #[arg(short = 'l', long, default_value = DEFAULT_LAYOUT)]
        layout: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ddlink starting");

    let codec = LinkCodec::new(RelativeTimeResolver::new());

    match cli.command {
        Commands::Links(LinksCommand::Build { filename }) => build_link(&codec, &filename),
        Commands::Links(LinksCommand::Parse { url, output }) => {
            parse_link(&codec, &url, output.as_deref())
        }
        Commands::Logs(LogsCommand::QueryToUrl {
            query,
            query_file,
            base_url,
            duration,
            end_time,
            layout,
        }) => query_to_url(
            query.as_deref(),
            query_file.as_deref(),
            &base_url,
            &duration,
            end_time.as_deref(),
            &layout,
        ),
    }
}

fn build_link(codec: &LinkCodec, filename: &Path) -> Result<()> {
    let data = fs::read_to_string(filename)
        .with_context(|| format!("failed to read link file {}", filename.display()))?;
    let link: DecodedLink = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse link file {}", filename.display()))?;

    let url = codec.encode(&link)?;
    println!("{url}");
    Ok(())
}

fn parse_link(codec: &LinkCodec, url: &str, output: Option<&Path>) -> Result<()> {
    let decoded = codec.decode(url)?;
    let rendered = serde_json::to_string_pretty(&decoded)?;

    match output {
        Some(path) => fs::write(path, rendered + "\n")
            .with_context(|| format!("failed to write link file {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn query_to_url(
    query: Option<&str>,
    query_file: Option<&Path>,
    base_url: &str,
    duration: &str,
    end_time: Option<&str>,
    layout: &str,
) -> Result<()> {
    let raw = match (query, query_file) {
        (Some(inline), None) => inline.to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read query file {}", path.display()))?,
        _ => bail!("exactly one of --query and --query-file must be specified"),
    };

    let mut params: BTreeMap<String, String> =
        serde_json::from_str(&raw).context("failed to parse query parameters")?;

    let length = parse_duration(duration)?;
    let range = range_ending_at(end_time, layout, length)?;
    finalize_query_params(&mut params, range);

    println!("{}", logs_url_from_params(base_url, &params));
    Ok(())
}

/// Merges the computed range into the query parameters and defaults `live` to
/// `"false"` so generated links are permalinks unless the caller explicitly
/// asked for live tailing.
fn finalize_query_params(params: &mut BTreeMap<String, String>, range: TimeRange) {
    params.insert("from_ts".to_string(), range.from_ts);
    params.insert("to_ts".to_string(), range.to_ts);
    params
        .entry("live".to_string())
        .or_insert_with(|| "false".to_string());
}
