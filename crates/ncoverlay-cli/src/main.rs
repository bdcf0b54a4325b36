mod cli;
mod config;
mod error;
mod normalize;

use std::io::{self, BufRead, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser as _;
use ncoverlay_parse::{parse_timecode, EvaluatedMeta, EvaluationCache, Parser, SearchQuery};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::{AppConfig, DEFAULT_LOG_FILTER};
use error::CliError;

/// Evaluated metadata plus search queries when a duration was given.
#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    meta: EvaluatedMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    queries: Option<Vec<SearchQuery>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "nco-title failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load(cli.config.as_deref());
    // A config that fails to load still gets its error logged.
    init_tracing(config.as_ref().map_or(DEFAULT_LOG_FILTER, |c| c.log.filter.as_str()));
    let config = config?;

    let duration = cli
        .duration
        .as_deref()
        .map(|d| parse_timecode(d).ok_or_else(|| CliError::Duration(d.to_string())))
        .transpose()?;
    let pretty = cli.pretty || config.output.pretty;
    let parser = Parser::new(config.parser);
    let mut cache = EvaluationCache::new();

    let inputs: Box<dyn Iterator<Item = io::Result<String>>> = if cli.titles.is_empty() {
        Box::new(io::stdin().lock().lines())
    } else {
        Box::new(cli.titles.into_iter().map(Ok))
    };

    let mut out = BufWriter::new(io::stdout().lock());
    for line in inputs {
        let line = line?;
        let title = if cli.no_normalize {
            line
        } else {
            normalize::normalize(&line)
        };

        let json = if cli.ast {
            to_json(&parser.ast(&title), pretty)?
        } else {
            let meta = cache.get_or_insert_with(&title, |t| parser.parse(t));
            let queries = duration.map(|d| meta.search_queries(d));
            to_json(&Output { meta, queries }, pretty)?
        };
        writeln!(out, "{json}")?;
    }
    out.flush()?;

    let stats = cache.stats();
    tracing::debug!(hits = stats.hits, misses = stats.misses, "done");
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
