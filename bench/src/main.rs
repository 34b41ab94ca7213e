use std::time::Instant;

use city_graph_core::{
    generate_random, k_nearest, path_to, run, DistanceMode, GenerationParams, Graph,
    GraphError, LocationRecord, LocationStore,
};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run every benchmark (default)
    All,
    /// Dijkstra using stored edge weights
    Weights,
    /// Dijkstra using great-circle distances
    Haversine,
    /// k-nearest ranking in both distance modes
    Nearest,
    /// Path reconstruction to far-away cities
    Path,
}

/// Benchmark binary for the city-graph-core shortest-path engine
#[derive(Parser)]
#[command(name = "city-graph-bench")]
struct Cli {
    #[arg(value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Number of synthetic cities
    #[arg(default_value_t = 1_000_000)]
    location_count: usize,

    /// Seed for city placement and adjacency generation
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    println!("city-graph-bench");
    println!("================");
    println!();

    if let Err(e) = run_benchmarks(&cli) {
        eprintln!("benchmark failed: {}", e);
        std::process::exit(1);
    }
}

fn run_benchmarks(cli: &Cli) -> Result<(), GraphError> {
    let mut rng = StdRng::seed_from_u64(cli.seed);

    println!("Target: {} cities", cli.location_count);
    let t = Instant::now();
    let store = synthetic_cities(cli.location_count, &mut rng)?;
    let mut graph = Graph::new();
    generate_random(
        &mut graph,
        store.count(),
        &GenerationParams::default(),
        &mut rng,
    )?;
    println!(
        "Generated in {:.2}s: {} cities, {} edges, ~{:.0}MB adjacency",
        t.elapsed().as_secs_f64(),
        store.count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    println!();

    if store.count() < 2 {
        println!("Need at least 2 cities to benchmark queries.");
        return Ok(());
    }

    let sources: Vec<usize> = (0..5).map(|_| rng.gen_range(0..store.count())).collect();

    if matches!(cli.mode, Mode::All | Mode::Weights) {
        bench_dijkstra("edge weights", &store, &graph, &sources, DistanceMode::EdgeWeight)?;
    }
    if matches!(cli.mode, Mode::All | Mode::Haversine) {
        bench_dijkstra("great-circle", &store, &graph, &sources, DistanceMode::GreatCircle)?;
    }
    if matches!(cli.mode, Mode::All | Mode::Nearest) {
        bench_nearest(&store, &graph, sources[0])?;
    }
    if matches!(cli.mode, Mode::All | Mode::Path) {
        bench_path(&store, &graph, &sources)?;
    }

    Ok(())
}

/// Cities scattered over a box roughly the size of the continental US,
/// with coordinates in radians.
fn synthetic_cities(count: usize, rng: &mut StdRng) -> Result<LocationStore, GraphError> {
    let mut store = LocationStore::new();
    store.load((0..count).map(|i| {
        LocationRecord::new(
            format!("City {}", i),
            format!("Region {}", i % 50),
            rng.gen_range(-2.15..-1.17),
            rng.gen_range(0.43..0.86),
        )
    }))?;
    Ok(store)
}

fn bench_dijkstra(
    name: &str,
    store: &LocationStore,
    graph: &Graph,
    sources: &[usize],
    mode: DistanceMode,
) -> Result<(), GraphError> {
    println!("--- Dijkstra ({}) ---", name);
    println!(
        "{:>10} {:>12} {:>12} {:>12} {:>10}",
        "source", "settled", "relaxed", "stale", "time"
    );
    println!("{:->10} {:->12} {:->12} {:->12} {:->10}", "", "", "", "", "");

    for &source in sources {
        let t = Instant::now();
        let sp = run(store, graph, source, mode)?;
        let elapsed = t.elapsed();
        println!(
            "{:>10} {:>12} {:>12} {:>12} {:>8.1}ms",
            source,
            sp.stats.settled,
            sp.stats.relaxations,
            sp.stats.stale_pops,
            elapsed.as_secs_f64() * 1000.0
        );
    }
    println!();
    Ok(())
}

fn bench_nearest(store: &LocationStore, graph: &Graph, source: usize) -> Result<(), GraphError> {
    println!("--- k-nearest from {} ---", source);
    println!("{:>8} {:>14} {:>14} {:>10}", "k", "mode", "farthest", "time");
    println!("{:->8} {:->14} {:->14} {:->10}", "", "", "", "");

    for k in [1, 10, 100, 1000] {
        for (label, mode) in [
            ("weights", DistanceMode::EdgeWeight),
            ("great-circle", DistanceMode::GreatCircle),
        ] {
            let t = Instant::now();
            let ranked = k_nearest(store, graph, source, k, mode)?;
            let elapsed = t.elapsed();
            let farthest = ranked.last().map_or(0.0, |n| n.distance);
            println!(
                "{:>8} {:>14} {:>14.1} {:>8.1}ms",
                k,
                label,
                farthest,
                elapsed.as_secs_f64() * 1000.0
            );
        }
    }
    println!();
    Ok(())
}

fn bench_path(store: &LocationStore, graph: &Graph, sources: &[usize]) -> Result<(), GraphError> {
    println!("--- Paths ---");
    let far = store.count() - 1;

    for &source in sources {
        let t = Instant::now();
        let result = path_to(store, graph, source, far);
        let elapsed = t.elapsed();
        match result {
            Ok(steps) => println!(
                "Path {} → {}: {} hops, distance {:.0} in {:.1}ms",
                source,
                far,
                steps.len() - 1,
                steps.last().map_or(0.0, |s| s.distance),
                elapsed.as_secs_f64() * 1000.0
            ),
            Err(GraphError::Unreachable { .. }) => println!(
                "Path {} → {}: no path ({:.1}ms)",
                source,
                far,
                elapsed.as_secs_f64() * 1000.0
            ),
            Err(e) => return Err(e),
        }
    }
    println!();
    Ok(())
}
