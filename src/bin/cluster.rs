//! Diagram Clustering Binary
//!
//! Reads a JSON array of diagrams (each an array of critical pairs), clusters
//! them and prints the report as JSON on stdout. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use pdclust::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "K-means clustering of persistence diagrams", long_about = None)]
struct Args {
    /// JSON file holding the input diagrams.
    #[arg(required = true)]
    input: PathBuf,
    /// Number of clusters.
    #[arg(short = 'k', long, default_value_t = 1)]
    clusters: usize,
    /// Wasserstein order: 1, 2 or inf.
    #[arg(short, long, default_value = "2", value_parser = order)]
    order: Order,
    /// Weight of birth/death against domain position.
    #[arg(long, default_value_t = 1.)]
    alpha: Energy,
    /// Position of each pair between its birth (1) and death (0) vertex.
    #[arg(long, default_value_t = 0.5)]
    lambda: Energy,
    /// Time limit in seconds; 0 or less means none.
    #[arg(short, long, default_value_t = 0.)]
    time_limit: f64,
    /// Worker threads; 0 uses every core.
    #[arg(short = 'j', long, default_value_t = 0)]
    threads: usize,
    /// 0 = min-saddle, 1 = saddle-saddle, 2 = saddle-max, anything else = all.
    #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
    selector: i32,
    #[arg(long)]
    kmeanspp: bool,
    /// Prune assignments with the triangle inequality.
    #[arg(long)]
    accelerated: bool,
    /// Match at full resolution from the first iteration.
    #[arg(long)]
    no_progressive: bool,
    /// Scan goods linearly instead of through a kd-tree.
    #[arg(long)]
    no_kdtree: bool,
    /// Run the full algorithm even when K = 1 or K = N.
    #[arg(long)]
    force: bool,
    /// Seed from the operating system.
    #[arg(long)]
    random: bool,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Stop once no centroid moves further than this.
    #[arg(long)]
    delta_limit: Option<Energy>,
    /// Iteration cap.
    #[arg(long, default_value_t = KMEANS_ITERATIONS)]
    iterations: usize,
    /// Include distance matrices in the report.
    #[arg(short, long)]
    matrices: bool,
    /// Only fill diagram-to-diagram entries within a cluster.
    #[arg(long)]
    per_cluster: bool,
    /// Compute matrices at full resolution.
    #[arg(long)]
    full_diagrams: bool,
    /// Leave matchings out of the report.
    #[arg(long)]
    no_matchings: bool,
    /// More logging.
    #[arg(short, long)]
    verbose: bool,
}

fn order(s: &str) -> std::result::Result<Order, String> {
    Order::try_from(s).map_err(|e| e.to_string())
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config::default()
            .with_clusters(args.clusters)
            .with_order(args.order)
            .with_alpha(args.alpha)
            .with_lambda(args.lambda)
            .with_time_limit(
                (args.time_limit > 0.).then(|| Duration::from_secs_f64(args.time_limit)),
            )
            .with_threads(args.threads)
            .with_selector(Selector::from(args.selector))
            .with_kmeanspp(args.kmeanspp)
            .with_accelerated(args.accelerated)
            .with_progressive(!args.no_progressive)
            .with_kdtree(!args.no_kdtree)
            .with_force(args.force)
            .with_deterministic(!args.random)
            .with_seed(args.seed)
            .with_delta_limit(args.delta_limit)
            .with_iterations(args.iterations)
            .with_matrices(args.matrices)
            .with_per_cluster(args.per_cluster)
            .with_full_diagrams(args.full_diagrams)
            .with_matchings(!args.no_matchings)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log(if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let diagrams = serde_json::from_str::<Vec<Vec<CriticalPair>>>(&text)
        .with_context(|| format!("parsing {}", args.input.display()))?;
    let config = Config::from(&args);
    let report = execute(&diagrams, &config)?;
    if let Some(warning) = report.warning {
        log::warn!("{:<32}{:<32}", "result not converged", warning);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
