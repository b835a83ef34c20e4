use anyhow::Context;
use clap::Parser;
use query_analyzer::cli::{Cli, Commands};
use query_analyzer::{Analysis, AnalyzerConfig, ConfigSource, QueryAnalyzer, Result};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    query_analyzer::tracing::init(cli.verbose);

    let (config, source) = AnalyzerConfig::discover(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let analyzer = QueryAnalyzer::from_config(&config)
        .with_context(|| format!("Invalid configuration in {}", source))?;

    match cli.command {
        Commands::Analyze { phrase, pretty } => {
            let analysis = analyzer.analyze_phrase(&phrase.join(" "));
            print_analysis(&analysis, pretty)?;
        }
        Commands::Batch { file } => batch(Arc::new(analyzer), &file).await?,
        Commands::CheckConfig => check_config(&config, &source, &analyzer),
    }

    Ok(())
}

fn print_analysis(analysis: &Analysis, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(analysis)?
    } else {
        serde_json::to_string(analysis)?
    };
    println!("{}", json);
    Ok(())
}

async fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin()))
            .await?
            .context("Failed to read stdin")
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))
    }
}

/// Analyze lines concurrently on the blocking pool, printing results in
/// input order.
async fn batch(analyzer: Arc<QueryAnalyzer>, file: &Path) -> Result<()> {
    let input = read_input(file).await?;

    let tasks: Vec<_> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let analyzer = Arc::clone(&analyzer);
            let line = line.to_string();
            tokio::task::spawn_blocking(move || analyzer.analyze_phrase(&line))
        })
        .collect();
    tracing::debug!("Analyzing {} phrases from {}", tasks.len(), file.display());

    let mut understood = 0;
    let mut stdout = std::io::stdout();
    for task in tasks {
        let analysis = task.await.context("Analysis task failed")?;
        if analysis.is_understood() {
            understood += 1;
        }
        serde_json::to_writer(&mut stdout, &analysis)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;

    tracing::info!("{} phrases fully understood", understood);
    Ok(())
}

fn check_config(config: &AnalyzerConfig, source: &ConfigSource, analyzer: &QueryAnalyzer) {
    let model = analyzer.model();
    println!("Configuration: {}", source);
    println!("  max_constructs: {}", config.analyzer.max_constructs);
    println!("  stop words: {}", config.dictionary.stop_words.len());
    println!("  units: {}", config.dictionary.units.len());
    println!("  quantities: {}", config.dictionary.quantities.len());
    println!(
        "  keywords: {}",
        config.dictionary.keywords.values().map(|k| k.len()).sum::<usize>()
    );
    println!("  filters: {}", model.filters().len());
    for (key, quantity) in model.quantities() {
        match &quantity.unit {
            Some(unit) => println!("    {} <- {} ({})", key, quantity.value, unit),
            None => println!("    {} <- {}", key, quantity.value),
        }
    }
}
