mod cli;
mod data;
mod query;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat};
use data::DataLoader;
use loot_core::Loot;
use query::Query;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tables_core::{Analysis, Analyzer, AnalyzerConfig, TableSelector};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loot_report=info,tables_core=warn,loot_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let parsed_query = cli.parsed_query.as_deref().map(Query::parse).transpose()?;
    let query = cli.query.as_deref().map(Query::parse).transpose()?;

    let loader = DataLoader::new(&cli.data_dir, cli.source.clone());
    loader.ensure(cli.force_download)?;
    let loot = loader.parse()?;

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory {}", cli.output.display()))?;

    if cli.no_analysis {
        let report = match &parsed_query {
            Some(parsed_query) => render::json(&parsed_query.select(&loot)?)?,
            None => render::json(&loot)?,
        };
        return write_report(&cli.output.join("loot.json"), &report);
    }

    let config = load_config(&cli)?;
    let selector = select_tables(&cli, &config, &loot, parsed_query.as_ref())?;

    let analyzer = Analyzer::new(&loot, config);
    let analysis = analyzer.analyze(&selector)?;
    info!(
        "Analyzed {} tables with {} data warnings",
        analysis.tables.len(),
        analysis.warnings().count()
    );

    let report = match &query {
        Some(query) => render_matches(cli.format, &query.select(&analysis.tables)?, &analysis)?,
        None => match cli.format {
            OutputFormat::Markdown => render::markdown(&analysis.tables, &analysis.diagnostics),
            OutputFormat::Json => render::json(&analysis.tables)?,
        },
    };
    let path = cli
        .output
        .join(format!("lootTables.{}", cli.format.extension()));
    write_report(&path, &report)
}

/// Tables to analyze: the parsed query's tables, narrowed by `--table`, or
/// else `--table` alone, or else the configured tables
fn select_tables(
    cli: &Cli,
    config: &AnalyzerConfig,
    loot: &Loot,
    parsed_query: Option<&Query>,
) -> Result<TableSelector> {
    let Some(parsed_query) = parsed_query else {
        return Ok(if cli.tables.is_empty() {
            config.selector()
        } else {
            TableSelector::only(cli.tables.clone())
        });
    };

    let mut ids = query::table_ids(&parsed_query.select(loot)?);
    if !cli.tables.is_empty() {
        ids.retain(|id| cli.tables.contains(id));
    }
    if ids.is_empty() {
        bail!("Parsed query matched no loot tables");
    }
    Ok(TableSelector::only(ids))
}

/// Render the nodes an analysis query matched
fn render_matches(format: OutputFormat, matches: &[Value], analysis: &Analysis) -> Result<String> {
    match format {
        OutputFormat::Json => render::json(matches),
        OutputFormat::Markdown => match query::analyzed_tables(matches) {
            Some(tables) => Ok(render::markdown(&tables, &analysis.diagnostics)),
            None => bail!("Query results are not loot tables, use --format json"),
        },
    }
}

/// Configuration file merged with command-line overrides
fn load_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.options.bucket_threshold = threshold;
    }
    if cli.force_merge {
        config.options.force_merge = true;
    }
    Ok(config)
}

fn write_report(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
