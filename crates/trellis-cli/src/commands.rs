//! CLI command implementations.

use crate::ConfigArgs;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use trellis_core::config::DEFAULT_CONFIG_FILE;
use trellis_core::{read_edge_list, save_edge_list, AugmentConfig};
use trellis_graph::{rank_nodes, AugmentReport, Augmenter, GraphStore, RunOutcome};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Layers defaults, the config file and flag/env overrides.
pub fn resolve_config(args: &ConfigArgs) -> Result<AugmentConfig> {
    let mut config = match &args.config {
        Some(path) => AugmentConfig::load(path)?,
        None => AugmentConfig::default(),
    };

    if let Some(limit) = args.per_node_limit {
        config.per_node_edge_limit = limit;
    }
    if let Some(target) = args.global_target {
        config.global_edge_target = target;
    }
    if let Some(threshold) = args.triangle_threshold {
        config.triangle_score_threshold = threshold;
    }
    if let Some(hops) = args.hops {
        config.local_betweenness_hops = hops;
    }
    if args.time_limit.is_some() {
        config.time_limit_secs = args.time_limit;
    }

    config.validate()?;
    tracing::debug!("Resolved config: {:?}", config);
    Ok(config)
}

/// Write a default config file.
pub fn init(path: &Path) -> Result<()> {
    let config_path = path.join(DEFAULT_CONFIG_FILE);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    std::fs::create_dir_all(path)?;
    AugmentConfig::default().save(&config_path)?;

    println!("{} Wrote {}", "✓".green(), config_path.display());
    println!(
        "  Run {} to augment a graph",
        "trellis augment <edges> --config trellis.json".cyan()
    );

    Ok(())
}

/// Reads the input graph. With `quiet` set nothing is printed, so stdout
/// stays free for JSON.
fn load_graph(input: &Path, quiet: bool) -> Result<GraphStore> {
    if quiet {
        return Ok(GraphStore::from_edges(read_edge_list(input)?));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Reading {}...", input.display()));

    let edges = read_edge_list(input)?;
    let graph = GraphStore::from_edges(edges);

    spinner.finish_and_clear();
    println!(
        "{} Loaded {} nodes, {} edges",
        "✓".green(),
        graph.node_count().to_string().cyan(),
        graph.edge_count().to_string().cyan()
    );

    Ok(graph)
}

/// Augment a graph and write the result.
pub fn augment(
    input: &Path,
    output: &Path,
    artificial: Option<&Path>,
    threads: Option<usize>,
    json_output: bool,
    args: &ConfigArgs,
) -> Result<()> {
    let config = resolve_config(args)?;

    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let mut graph = load_graph(input, json_output)?;

    let bar = if json_output {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(graph.node_count() as u64)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} nodes ({eta})")?,
    );

    let progress = bar.clone();
    let report = Augmenter::new(&mut graph, &config)
        .with_progress(move |done, _total| progress.set_position(done as u64))
        .run()?;

    bar.finish_and_clear();

    save_edge_list(output, graph.edges())?;
    if let Some(path) = artificial {
        save_edge_list(path, report.artificial_edges.iter().copied())?;
    }

    if json_output {
        let output = serde_json::json!({
            "outcome": report.outcome,
            "config": config,
            "stats": report.stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&report, output, artificial);
    }

    Ok(())
}

fn print_summary(report: &AugmentReport, output: &Path, artificial: Option<&Path>) {
    let stats = &report.stats;

    let outcome = match report.outcome {
        RunOutcome::Completed => report.outcome.to_string().green(),
        RunOutcome::BudgetExhausted => report.outcome.to_string().yellow(),
        RunOutcome::DeadlineReached => report.outcome.to_string().red(),
    };

    println!("{}", "Augmentation".cyan().bold());
    println!();
    println!("  {} {}", "Outcome:".dimmed(), outcome);
    println!(
        "  {} {} -> {} (+{})",
        "Edges:".dimmed(),
        stats.edges_before,
        stats.edges_after,
        stats.artificial_edges.to_string().bold()
    );
    println!(
        "  {} {} processed, {} gained edges",
        "Nodes:".dimmed(),
        stats.nodes_processed,
        stats.nodes_augmented
    );
    println!(
        "  {} {} considered, {} qualified, {} selected",
        "Triangle:".dimmed(),
        stats.triangle_candidates_considered,
        stats.triangle_candidates_qualified,
        stats.triangle_candidates_selected.to_string().cyan()
    );
    println!(
        "  {} {} considered, {} qualified, {} selected",
        "Betweenness:".dimmed(),
        stats.betweenness_candidates_considered,
        stats.betweenness_candidates_qualified,
        stats.betweenness_candidates_selected.to_string().cyan()
    );
    if stats.saturated_skips > 0 {
        println!(
            "  {} {} candidates already at their cap",
            "Skipped:".dimmed(),
            stats.saturated_skips
        );
    }
    println!();
    println!("{} Wrote {}", "✓".green(), output.display());
    if let Some(path) = artificial {
        println!("{} Wrote {}", "✓".green(), path.display());
    }
    println!("Time: {}ms", stats.elapsed_ms);
}

/// Print the node processing order.
pub fn rank(input: &Path, limit: usize, json_output: bool, args: &ConfigArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let graph = load_graph(input, json_output)?;
    let ranking = rank_nodes(&graph, config.triangle_score_threshold);

    if json_output {
        let rows: Vec<_> = ranking.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{} (threshold {})",
        "Node ranking".cyan().bold(),
        config.triangle_score_threshold
    );
    println!();

    for (position, ranked) in ranking.iter().take(limit).enumerate() {
        println!(
            "  {:>4}. {} {}",
            position + 1,
            ranked.node.to_string().cyan(),
            format!("({} qualifying candidates)", ranked.qualifying).dimmed()
        );
    }
    if ranking.len() > limit {
        println!("  ... and {} more", ranking.len() - limit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, r#"{ "per_node_edge_limit": 3, "local_betweenness_hops": 2 }"#)
            .unwrap();

        let args = ConfigArgs {
            config: Some(path),
            hops: Some(5),
            ..ConfigArgs::default()
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.per_node_edge_limit, 3);
        assert_eq!(config.local_betweenness_hops, 5);
        assert_eq!(config.global_edge_target, 1_000_000);
    }

    #[test]
    fn test_zero_time_limit_flag_rejected() {
        let args = ConfigArgs {
            time_limit: Some(0),
            ..ConfigArgs::default()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempdir().unwrap();
        init(dir.path()).unwrap();

        let config = AugmentConfig::load(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, AugmentConfig::default());
    }

    #[test]
    fn test_augment_writes_edge_lists() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("square.edgelist");
        let output = dir.path().join("out.edgelist");
        let artificial = dir.path().join("artificial.edgelist");
        std::fs::write(&input, "1 2\n2 3\n3 4\n4 1\n").unwrap();

        augment(
            &input,
            &output,
            Some(&artificial),
            None,
            true,
            &ConfigArgs::default(),
        )
        .unwrap();

        let written = read_edge_list(&output).unwrap();
        assert_eq!(written, vec![(1, 2), (2, 3), (3, 4), (4, 1), (1, 3), (2, 4)]);
        assert_eq!(read_edge_list(&artificial).unwrap(), vec![(1, 3), (2, 4)]);
    }
}
