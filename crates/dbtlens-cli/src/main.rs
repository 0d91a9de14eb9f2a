use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use dbtlens_artifacts::{
    read_manifest, read_run_results, GraphIndex, Manifest, TargetArtifacts, MANIFEST_FILE,
    RUN_RESULTS_FILE,
};
use dbtlens_core::{Config, ManifestStats, OverviewReport, RunSummary};
use dbtlens_engine::{compute_lineage, compute_manifest_stats, summarize_run};

/// dbtlens - dbt artifact statistics and criticality ranking
#[derive(Parser)]
#[command(name = "dbtlens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dbtlens.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// dbt target directory (overrides the configured one)
    #[arg(short, long, global = true)]
    target_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print manifest statistics and the criticality ranking
    Overview {
        /// Also write the JSON overview report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show downstream reach for a node
    Lineage {
        /// Node to analyze (can be short name or unique_id)
        node: String,
    },

    /// Summarize run_results.json
    Results,

    /// Pretty print the manifest.json
    PrintManifest {
        /// Indentation level
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },

    /// Pretty print the run_results.json
    PrintRunResults {
        /// Indentation level
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("dbtlens.toml").exists() {
        Config::from_file(Path::new("dbtlens.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    let target_dir = cli
        .target_dir
        .clone()
        .unwrap_or_else(|| config.resolved_target_dir());

    if cli.verbose {
        eprintln!("{} {}", "Target directory:".cyan(), target_dir.display());
    }

    match cli.command {
        Commands::Overview { output } => {
            overview_command(&config, &target_dir, output.as_deref(), cli.verbose)
        }
        Commands::Lineage { node } => lineage_command(&target_dir, &node, cli.verbose),
        Commands::Results => results_command(&target_dir, cli.verbose),
        Commands::PrintManifest { indent } => {
            let manifest = read_manifest(&target_dir.join(MANIFEST_FILE))?;
            print_json(&manifest, indent)
        }
        Commands::PrintRunResults { indent } => {
            let run_results = read_run_results(&target_dir.join(RUN_RESULTS_FILE))?;
            print_json(&run_results, indent)
        }
    }
}

/// Overview command - stats, ranking, and optional JSON report
fn overview_command(
    config: &Config,
    target_dir: &Path,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("{}", "Loading artifacts...".cyan());
    }

    let artifacts = TargetArtifacts::read(target_dir)?;
    let graph = GraphIndex::from_manifest(&artifacts.manifest);

    if verbose {
        eprintln!("{}", "Computing statistics and ranking...".cyan());
    }

    let stats = compute_manifest_stats(&artifacts.manifest, &graph);
    let run = artifacts.run_results.as_ref().map(summarize_run);

    print_overview(&stats, run.as_ref());

    let mut report = OverviewReport::new(artifacts.manifest.metadata.invocation_id.clone(), stats);
    if let Some(run) = run {
        report = report.with_run(run);
    }

    // the CLI flag wins over the configured output path
    let output = output.or(config.report.output.as_deref());
    if let Some(path) = output {
        report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    Ok(())
}

/// Print the overview to stdout
fn print_overview(stats: &ManifestStats, run: Option<&RunSummary>) {
    println!("{}", "Overall Project Stats:".bold());
    println!("- Model Count: {}", stats.model_count);
    println!("- Sources Count: {}", stats.sources_count);
    println!("- Seeds Count: {}", stats.seeds_count);
    println!("- Test Count: {}", stats.test_count);
    println!("- Unit Tests Count: {}", stats.unit_tests_count);
    println!(
        "- Models with Tests: {}/{}",
        stats.models_with_tests, stats.model_count
    );
    println!(
        "- Seeds with Tests: {}/{}",
        stats.seeds_with_tests, stats.seeds_count
    );
    println!(
        "- Sources with Tests: {}/{}",
        stats.sources_with_tests, stats.sources_count
    );

    let tested_important = stats
        .important_nodes
        .iter()
        .filter(|node| node.test_count > 0)
        .count();
    println!(
        "- Important Nodes with Tests: {}/{}",
        tested_important,
        stats.important_nodes.len()
    );

    println!();
    println!("{}", "Important Nodes:".bold());
    for (index, node) in stats.important_nodes.iter().enumerate() {
        let rank = format!("{}.", index + 1);
        println!(
            "{:<4} Node={} Tests={}",
            rank, node.unique_id, node.test_count
        );
    }

    if let Some(run) = run {
        println!();
        print_run_summary(run);
    }
}

/// Lineage command - downstream reach for one node
fn lineage_command(target_dir: &Path, node: &str, verbose: bool) -> Result<()> {
    let artifacts = TargetArtifacts::read(target_dir)?;
    let graph = GraphIndex::from_manifest(&artifacts.manifest);

    // Find the node (support both short name and unique_id)
    let node_id = find_node_id(&artifacts.manifest, node)?;

    if verbose {
        eprintln!("{} {}", "Analyzing lineage for:".cyan(), node_id);
    }

    let info = compute_lineage(&artifacts.manifest, &graph, &node_id);
    let downstream = graph.downstream(&node_id);

    println!("{} {}", "Node:".bold(), node_id.green());
    println!(
        "{} {}",
        "Downstream nodes (including self):".bold(),
        info.downstream_total
    );
    println!(
        "{} {}",
        "Downstream exposures:".bold(),
        info.downstream_exposures
    );
    println!();

    if downstream.is_empty() {
        println!("{}", "No downstream dependents".green());
    } else {
        println!("{}", "Dependents (in discovery order):".bold());
        for (i, dep) in downstream.iter().enumerate() {
            let label = artifacts
                .manifest
                .node(dep)
                .map(|n| format!("{} ({})", dep, n.resource_type))
                .unwrap_or_else(|| dep.clone());
            println!("  {}. {}", i + 1, label.yellow());
        }
    }

    Ok(())
}

/// Find node ID from short name or unique_id
fn find_node_id(manifest: &Manifest, name: &str) -> Result<String> {
    // If it's already a unique_id (contains dots), use it directly
    if name.contains('.') && manifest.node(name).is_some() {
        return Ok(name.to_string());
    }

    // Otherwise, search for a matching node name
    for node in manifest.all_nodes() {
        if node.name.as_deref() == Some(name) {
            return Ok(node.unique_id.clone());
        }
    }

    Err(anyhow::anyhow!(
        "Node '{}' not found in manifest. Try using the full unique_id (e.g., 'model.project.{}')",
        name,
        name
    ))
}

/// Results command - run_results.json summary
fn results_command(target_dir: &Path, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("{}", "Loading run results...".cyan());
    }

    let run_results = read_run_results(&target_dir.join(RUN_RESULTS_FILE))?;
    let summary = summarize_run(&run_results);

    print_run_summary(&summary);

    // Exit with error code if the run had failures
    if summary.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// Print a run summary to stdout
fn print_run_summary(summary: &RunSummary) {
    println!("{}", "Run Results:".bold());
    println!("- Total: {}", summary.total);
    println!("- Succeeded: {}", summary.succeeded);
    println!("- Passed: {}", summary.passed);

    if summary.errored > 0 {
        println!("- Errored: {}", summary.errored.to_string().red().bold());
    } else {
        println!("- Errored: {}", summary.errored);
    }

    if summary.failed > 0 {
        println!("- Failed: {}", summary.failed.to_string().red().bold());
    } else {
        println!("- Failed: {}", summary.failed);
    }

    println!("- Skipped: {}", summary.skipped);

    if !summary.failures.is_empty() {
        println!();
        println!("{}", "Failures:".bold());
        for failure in &summary.failures {
            println!(
                "  [{}] {}",
                failure.status.red().bold(),
                failure.unique_id
            );
            if let Some(message) = &failure.message {
                println!("    {}", message);
            }
        }
    }

    if !summary.slowest.is_empty() {
        println!();
        println!("{}", "Slowest nodes:".bold());
        for node in &summary.slowest {
            println!(
                "  {:>8}ms  {} ({})",
                node.duration_ms, node.unique_id, node.status
            );
        }
    }
}

/// Pretty print a serializable artifact with the requested indentation
fn print_json<T: serde::Serialize>(value: &T, indent: usize) -> Result<()> {
    let indent_str = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    println!("{}", String::from_utf8(buf)?);
    Ok(())
}
