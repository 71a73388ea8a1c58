use anyhow::Result;
use clap::Parser;
use lifetrace::cli::{Cli, OutputFormat};
use lifetrace::config::ReportConfig;
use lifetrace::error::ReportError;
use lifetrace::html_output::HtmlOutput;
use lifetrace::json_output::JsonOutput;
use lifetrace::report::{Report, ReportBuilder};
use lifetrace::{csv_output, ingest, text_output};
use regex::Regex;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Read and parse an optional source file
///
/// A file that cannot be read is fatal; a file that cannot be parsed is
/// handed to the report builder as a malformed source.
fn load<T>(
    path: Option<&Path>,
    parse: fn(&str) -> std::result::Result<T, ReportError>,
) -> Result<Option<std::result::Result<T, ReportError>>> {
    path.map(|p| ingest::read_source(p).map(|text| parse(&text)))
        .transpose()
}

fn render(report: &Report, format: OutputFormat, now_ms: i64) -> Result<String> {
    let output = match format {
        OutputFormat::Text => text_output::report_to_text(report),
        OutputFormat::Csv => csv_output::report_to_csv(report),
        OutputFormat::Html => HtmlOutput::new(report).to_html(),
        OutputFormat::Json => {
            let mut json = JsonOutput::new(report, now_ms).to_json()?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => ReportConfig::from_toml(path)?,
        None => ReportConfig::default(),
    };

    // CLI flags take precedence over the config file
    let now_ms = args
        .now_ms
        .or(config.report.now_ms)
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let filter = match &args.filter {
        Some(pattern) => Some(Regex::new(pattern)?),
        None => config.component_filter()?,
    };
    let format = args
        .format
        .or(config.output.format)
        .unwrap_or(OutputFormat::Text);
    let csv_dir = args.csv_dir.clone().or(config.output.csv_dir.clone());

    let mut builder = ReportBuilder::new(now_ms).component_filter(filter);
    if let Some(sort) = args.sort.clone().or(config.report.sort_column.clone()) {
        builder = builder.usage_sort(sort, args.descending || config.report.descending);
    }
    if let Some(trace) = load(args.events.as_deref(), ingest::parse_event_trace)? {
        builder = builder.trace(trace);
    }
    if let Some(usage) = load(args.usage.as_deref(), ingest::parse_usage_history)? {
        builder = builder.usage(usage);
    }
    if let Some(packages) = load(args.packages.as_deref(), ingest::parse_inventory)? {
        builder = builder.inventory(packages);
    }

    let report = builder.build();
    tracing::debug!(
        sections = report.sections.len(),
        diagnostics = report.diagnostics.len(),
        "report assembled"
    );

    for diagnostic in &report.diagnostics {
        eprintln!("{}", diagnostic);
    }

    print!("{}", render(&report, format, now_ms)?);

    if let Some(dir) = csv_dir {
        for path in csv_output::export_report(&report, &dir)? {
            eprintln!("Wrote {}", path.display());
        }
    }

    Ok(())
}
