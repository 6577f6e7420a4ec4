//! sales-insights developer CLI
//!
//! Exercise the content engine from a terminal:
//!
//!   sales-insights select --industry=Healthcare --pain="rising cloud cost" [--seed=7] [--json]
//!   sales-insights select --payload=context.json
//!   sales-insights --pools
//!   sales-insights --config <pool> <index>
//!   sales-insights --validate [corpus.json | corpus-dir]

use anyhow::{bail, Context, Result};
use sales_insights::{
    config::{CorpusSource, EngineConfig},
    corpus::PoolGroup,
    render, ContextPayload, InsightEngine, Visualization,
};
use std::path::Path;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "select" => run_select(&args[2..]),
        "--pools" => run_pools(),
        "--config" => {
            let (Some(pool), Some(index)) = (args.get(2), args.get(3)) else {
                bail!("Usage: --config <pool> <index>");
            };
            let index: usize = index
                .parse()
                .with_context(|| format!("Invalid index {:?}", index))?;
            run_config(pool, index)
        }
        "--validate" => run_validate(args.get(2).map(|s| s.as_str())),
        "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {}", other)
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  sales-insights select [--industry=X] [--cloud=X] [--company=X] [--topic=X]");
    eprintln!("                        [--tech=X]... [--pain=X]... [--payload=FILE] [--seed=N] [--json]");
    eprintln!("  sales-insights --pools");
    eprintln!("  sales-insights --config <pool> <index>");
    eprintln!("  sales-insights --validate [PATH]");
}

/// Value of `--name=value`
fn flag<'a>(arg: &'a str, name: &str) -> Option<&'a str> {
    arg.strip_prefix("--")
        .and_then(|rest| rest.strip_prefix(name))
        .and_then(|rest| rest.strip_prefix('='))
}

fn parse_payload(args: &[String]) -> Result<ContextPayload> {
    let mut payload = match args.iter().find_map(|a| flag(a, "payload")) {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload {:?}", path))?;
            serde_json::from_str::<ContextPayload>(&json)
                .with_context(|| format!("Invalid payload JSON in {:?}", path))?
        }
        None => ContextPayload::default(),
    };

    for arg in args {
        if let Some(v) = flag(arg, "industry") {
            payload.industry = Some(v.to_string());
        } else if let Some(v) = flag(arg, "cloud") {
            payload.cloud_provider = Some(v.to_string());
        } else if let Some(v) = flag(arg, "company") {
            payload.company = Some(v.to_string());
        } else if let Some(v) = flag(arg, "topic") {
            payload.topic = Some(v.to_string());
        } else if let Some(v) = flag(arg, "tech") {
            payload.technologies.push(v.to_string());
        } else if let Some(v) = flag(arg, "pain") {
            payload.pain_points.push(v.to_string());
        }
    }
    Ok(payload)
}

fn run_select(args: &[String]) -> Result<()> {
    let json_output = args.iter().any(|a| a == "--json");
    let seed = args
        .iter()
        .find_map(|a| flag(a, "seed"))
        .map(|s| s.parse::<u64>().with_context(|| format!("Invalid seed {:?}", s)))
        .transpose()?;

    let payload = parse_payload(args)?;
    let config = EngineConfig::from_env()?.with_seed(seed);
    let corpus = config.load_corpus()?;
    let engine = InsightEngine::new(&corpus);
    let mut rng = config.rng();

    let card: Visualization = engine.visualize(&payload, &mut rng);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }

    println!("Stage:  {}", card.stage.name());
    println!("Pool:   {}", card.pool);
    println!("Chart:  {}", card.chart_type);
    if !card.export.title.is_empty() {
        println!("Title:  {}", card.export.title);
    }
    println!();
    println!("{}", card.insight);
    println!();
    for (label, value) in &card.export.rows {
        println!("  {:<24} {}", label, value);
    }
    Ok(())
}

fn run_pools() -> Result<()> {
    let config = EngineConfig::from_env()?;
    let corpus = config.load_corpus()?;

    for group in PoolGroup::ALL {
        let names = corpus.pool_names(group);
        if names.is_empty() {
            continue;
        }
        println!("{}:", group.name());
        for name in names {
            println!("  {:<16} {} artifact(s)", name, corpus.pool(name).len());
        }
    }
    println!(
        "\n{} pools, {} artifacts",
        corpus.len(),
        corpus.artifact_count()
    );
    Ok(())
}

fn run_config(pool: &str, index: usize) -> Result<()> {
    let config = EngineConfig::from_env()?;
    let corpus = config.load_corpus()?;
    let artifacts = corpus.pool(pool);
    let Some(artifact) = artifacts.get(index) else {
        bail!(
            "Pool '{}' has {} artifact(s); index {} is out of range",
            pool,
            artifacts.len(),
            index
        );
    };

    println!("{}", serde_json::to_string_pretty(&render::build_config(artifact))?);
    Ok(())
}

fn run_validate(path: Option<&str>) -> Result<()> {
    let config = match path {
        Some(p) => EngineConfig {
            corpus: CorpusSource::from_path(Path::new(p)),
            seed: None,
        },
        None => EngineConfig::from_env()?,
    };
    let corpus = config.load_corpus()?;

    let empty: Vec<&str> = corpus
        .pools()
        .filter(|p| p.artifacts.is_empty())
        .map(|p| p.name.as_str())
        .collect();
    if corpus.variety_pool().is_empty() {
        tracing::warn!("no generic or advanced pools; unmatched payloads will get the default artifact");
    }

    println!(
        "OK: {} pools, {} artifacts ({:?})",
        corpus.len(),
        corpus.artifact_count(),
        config.corpus
    );
    if !empty.is_empty() {
        println!("Empty pools: {}", empty.join(", "));
    }
    Ok(())
}
