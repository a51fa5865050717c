//! CLI command implementations

use anyhow::{Context, bail};
use phiflow_core::{FlowGraph, PhiflowConfig, Route, SearchConfig, find_path, find_paths, load_graph};
use phiflow_score::{EnergyTransfer, energy_coherence_score, sequence_phi_deviation};
use std::path::Path;

use crate::SearchArgs;

/// Read the config file if one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PhiflowConfig> {
    match path {
        Some(path) => PhiflowConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PhiflowConfig::default()),
    }
}

/// Apply command-line overrides on top of the configured search settings.
pub fn search_config(base: &SearchConfig, args: &SearchArgs) -> SearchConfig {
    let mut config = base.clone();
    if let Some(w) = args.cost_weight {
        config.cost_weight = w;
    }
    if let Some(w) = args.coherence_weight {
        config.coherence_weight = w;
    }
    if args.weight_floor.is_some() {
        config.weight_floor = args.weight_floor;
    }
    if args.max_relaxations.is_some() {
        config.max_relaxations = args.max_relaxations;
    }
    config.strict_nodes |= args.strict;
    config
}

/// Split a `FROM:TO` query at the first `:`. Node names after the
/// separator may contain further colons.
pub fn parse_pair(pair: &str) -> anyhow::Result<(String, String)> {
    match pair.split_once(':') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => bail!("Invalid pair {:?}, expected FROM:TO", pair),
    }
}

fn open_graph(path: &Path, config: &PhiflowConfig) -> anyhow::Result<FlowGraph> {
    load_graph(path, &config.score).with_context(|| format!("Failed to load graph {}", path.display()))
}

fn print_route(from: &str, to: &str, route: Option<&Route>) {
    match route {
        Some(route) => {
            println!("Optimal coherent path from {} to {}: {}", from, to, route.display_path());
            println!("  Total traditional cost: {}", route.total_cost);
            println!("  Sum of coherence scores: {:.2}", route.total_coherence);
            println!("  Combined cost: {:.2}", route.combined_cost);
        }
        None => println!("No coherent path found from {} to {}.", from, to),
    }
}

pub fn route(
    graph_path: &Path,
    from: &str,
    to: &str,
    config: &PhiflowConfig,
    args: &SearchArgs,
    json: bool,
) -> anyhow::Result<()> {
    let graph = open_graph(graph_path, config)?;
    let search = search_config(&config.search, args);

    tracing::info!("Coherent flow pathfinding from {} to {}", from, to);
    let route = find_path(&graph, from, to, &search)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&route)?);
    } else {
        print_route(from, to, route.as_ref());
    }
    Ok(())
}

pub fn batch(
    graph_path: &Path,
    pairs: &[String],
    config: &PhiflowConfig,
    args: &SearchArgs,
    json: bool,
) -> anyhow::Result<()> {
    let graph = open_graph(graph_path, config)?;
    let search = search_config(&config.search, args);
    let queries = pairs
        .iter()
        .map(|p| parse_pair(p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::info!("Routing {} queries", queries.len());
    let results = find_paths(&graph, &queries, &search);

    let mut report = Vec::with_capacity(results.len());
    for ((from, to), result) in queries.iter().zip(results) {
        match result {
            Ok(route) => {
                if json {
                    report.push(serde_json::json!({ "from": from, "to": to, "route": route }));
                } else {
                    print_route(from, to, route.as_ref());
                }
            }
            Err(e) => {
                tracing::warn!("Search from {} to {} failed: {}", from, to, e);
                if json {
                    report.push(serde_json::json!({ "from": from, "to": to, "error": e.to_string() }));
                } else {
                    println!("Search from {} to {} failed: {}", from, to, e);
                }
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

pub fn score(
    config: &PhiflowConfig,
    initial: f64,
    final_magnitude: f64,
    efficiency: f64,
    entropy_change: f64,
) -> anyhow::Result<()> {
    let transfer = EnergyTransfer {
        initial_magnitude: initial,
        final_magnitude,
        efficiency,
        entropy_change,
    };
    let score = energy_coherence_score(&transfer, &config.score);
    println!("Energy coherence score: {:.4}", score);
    Ok(())
}

pub fn sequence(values: &[f64]) -> anyhow::Result<()> {
    tracing::debug!("Scoring sequence of {} values", values.len());
    println!("Sequence phi deviation: {:.4}", sequence_phi_deviation(values));
    Ok(())
}
