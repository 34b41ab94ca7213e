//! Single-source shortest paths (Dijkstra) over the adjacency graph.
//!
//! Each run owns its scratch state (distance, predecessor, visited) in a
//! `ShortestPaths` value keyed by location id, so locations are never
//! mutated and runs never observe each other's distances.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph};
use crate::location::{Location, LocationId, LocationStore};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance in miles between two locations.
///
/// Longitude and latitude are fed to the trigonometric functions exactly as
/// stored, i.e. they are treated as radians. Data recorded in degrees is not
/// converted.
pub fn haversine(a: &Location, b: &Location) -> f64 {
    let dlon = b.longitude - a.longitude;
    let dlat = b.latitude - a.latitude;
    // Rounding can push h just past 1 for near-antipodal pairs
    let h = ((dlat / 2.0).sin().powi(2)
        + a.latitude.cos() * b.latitude.cos() * (dlon / 2.0).sin().powi(2))
    .min(1.0);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

/// How the cost of traversing an edge is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMode {
    /// The weight stored on the edge.
    EdgeWeight,
    /// Haversine distance between the edge's endpoints; the stored weight is ignored.
    GreatCircle,
}

/// Per-location scratch record for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scratch {
    pub distance: f64,
    pub predecessor: Option<LocationId>,
    pub visited: bool,
}

impl Default for Scratch {
    fn default() -> Self {
        Self {
            distance: f64::INFINITY,
            predecessor: None,
            visited: false,
        }
    }
}

/// Work counters for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub settled: usize,
    pub relaxations: usize,
    pub heap_pushes: usize,
    pub stale_pops: usize,
}

/// Output of one Dijkstra run from `source`.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: LocationId,
    scratch: Vec<Scratch>,
    pub stats: RunStats,
}

impl ShortestPaths {
    pub fn source(&self) -> LocationId {
        self.source
    }

    /// Shortest known distance; `INFINITY` if unreachable or unknown.
    pub fn distance(&self, id: LocationId) -> f64 {
        self.scratch.get(id).map_or(f64::INFINITY, |s| s.distance)
    }

    /// Previous location on the shortest path; `None` for the source and
    /// for unreachable locations.
    pub fn predecessor(&self, id: LocationId) -> Option<LocationId> {
        self.scratch.get(id).and_then(|s| s.predecessor)
    }

    pub fn is_reachable(&self, id: LocationId) -> bool {
        self.distance(id).is_finite()
    }

    /// Scratch records indexed by location id.
    pub fn records(&self) -> &[Scratch] {
        &self.scratch
    }

    /// Ids from the source to `target` inclusive, following predecessor links.
    pub fn path_to(&self, target: LocationId) -> Result<Vec<LocationId>> {
        if target >= self.scratch.len() {
            return Err(GraphError::NotFound {
                id: target,
                count: self.scratch.len(),
            });
        }
        if !self.is_reachable(target) {
            return Err(GraphError::Unreachable {
                from: self.source,
                to: target,
            });
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.scratch[current].predecessor {
            path.push(prev);
            current = prev;
        }

        path.reverse();
        Ok(path)
    }
}

/// Heap entry: a tentative distance recorded when the entry was pushed.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    id: LocationId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on distance
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Run Dijkstra from `source` with the given distance mode.
pub fn run(
    store: &LocationStore,
    graph: &Graph,
    source: LocationId,
    mode: DistanceMode,
) -> Result<ShortestPaths> {
    let locations = store.as_slice();
    match mode {
        DistanceMode::EdgeWeight => run_with(store, graph, source, |e| e.weight),
        DistanceMode::GreatCircle => run_with(store, graph, source, |e| {
            haversine(&locations[e.from], &locations[e.to])
        }),
    }
}

/// Run Dijkstra from `source`, measuring each edge with `cost`.
///
/// Uses a binary heap with lazy deletion: an improved distance pushes a new
/// entry and outdated entries are skipped when popped. Equal distances are
/// settled in no guaranteed order.
pub fn run_with<F>(
    store: &LocationStore,
    graph: &Graph,
    source: LocationId,
    mut cost: F,
) -> Result<ShortestPaths>
where
    F: FnMut(&Edge) -> f64,
{
    store.get(source)?;
    if graph.location_count() > store.count() {
        return Err(GraphError::InvalidArgument(format!(
            "adjacency covers {} locations but only {} are loaded",
            graph.location_count(),
            store.count()
        )));
    }

    let mut scratch = vec![Scratch::default(); store.count()];
    let mut stats = RunStats::default();
    let mut heap = BinaryHeap::new();

    scratch[source].distance = 0.0;
    heap.push(Candidate {
        distance: 0.0,
        id: source,
    });
    stats.heap_pushes += 1;

    while let Some(Candidate { distance, id: u }) = heap.pop() {
        if scratch[u].visited || distance > scratch[u].distance {
            stats.stale_pops += 1;
            continue;
        }
        scratch[u].visited = true;
        stats.settled += 1;

        for edge in graph.edges_from(u) {
            let v = edge.to;
            if scratch[v].visited {
                continue;
            }

            let w = cost(edge);
            if w.is_nan() || w < 0.0 {
                return Err(GraphError::InvalidArgument(format!(
                    "edge {}->{} has invalid cost {}",
                    edge.from, edge.to, w
                )));
            }

            stats.relaxations += 1;
            let candidate = distance + w;
            if candidate < scratch[v].distance {
                scratch[v].distance = candidate;
                scratch[v].predecessor = Some(u);
                heap.push(Candidate {
                    distance: candidate,
                    id: v,
                });
                stats.heap_pushes += 1;
            }
        }
    }

    log::debug!(
        "dijkstra from {}: settled {}/{}, {} relaxations, {} stale pops",
        source,
        stats.settled,
        scratch.len(),
        stats.relaxations,
        stats.stale_pops
    );

    Ok(ShortestPaths {
        source,
        scratch,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{generate_random, GenerationParams};
    use crate::location::LocationRecord;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Apple Valley -> Bakersfield -> Chico, plus a direct but longer 0->2.
    fn make_triangle() -> (LocationStore, Graph) {
        let mut store = LocationStore::new();
        store
            .load(vec![
                LocationRecord::new("Apple Valley", "CA", -2.046, 0.603),
                LocationRecord::new("Bakersfield", "CA", -2.085, 0.615),
                LocationRecord::new("Chico", "CA", -2.126, 0.693),
            ])
            .unwrap();
        let mut g = Graph::with_locations(3);
        g.insert_edge(0, 1, 100.0).unwrap();
        g.insert_edge(1, 2, 200.0).unwrap();
        g.insert_edge(0, 2, 500.0).unwrap();
        (store, g)
    }

    fn make_random(n: usize, seed: u64) -> (LocationStore, Graph) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = LocationStore::new();
        store
            .load((0..n).map(|i| {
                LocationRecord::new(
                    format!("City {}", i),
                    "Region",
                    rng.gen_range(-2.1..-1.2),
                    rng.gen_range(0.5..0.8),
                )
            }))
            .unwrap();
        let mut g = Graph::new();
        generate_random(&mut g, n, &GenerationParams::default(), &mut rng).unwrap();
        (store, g)
    }

    fn path_cost(store: &LocationStore, g: &Graph, path: &[LocationId], mode: DistanceMode) -> f64 {
        path.windows(2)
            .map(|pair| {
                g.edges_from(pair[0])
                    .iter()
                    .filter(|e| e.to == pair[1])
                    .map(|e| match mode {
                        DistanceMode::EdgeWeight => e.weight,
                        DistanceMode::GreatCircle => haversine(
                            store.get(e.from).unwrap(),
                            store.get(e.to).unwrap(),
                        ),
                    })
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    #[test]
    fn test_triangle_edge_weights() {
        let (store, g) = make_triangle();
        let sp = run(&store, &g, 0, DistanceMode::EdgeWeight).unwrap();
        assert_eq!(sp.distance(0), 0.0);
        assert_eq!(sp.distance(1), 100.0);
        assert_eq!(sp.distance(2), 300.0);
        assert_eq!(sp.predecessor(0), None);
        assert_eq!(sp.predecessor(1), Some(0));
        assert_eq!(sp.predecessor(2), Some(1));
        assert_eq!(sp.path_to(2).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_triangle_great_circle_ignores_weights() {
        let (store, g) = make_triangle();
        let sp = run(&store, &g, 0, DistanceMode::GreatCircle).unwrap();
        let a = store.get(0).unwrap();
        let b = store.get(1).unwrap();
        let c = store.get(2).unwrap();
        let via_b = haversine(a, b) + haversine(b, c);
        let direct = haversine(a, c);

        assert!((sp.distance(1) - haversine(a, b)).abs() < 1e-9);
        assert!((sp.distance(2) - via_b.min(direct)).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_stays_infinite() {
        let (store, g) = make_triangle();
        let sp = run(&store, &g, 2, DistanceMode::EdgeWeight).unwrap();
        assert_eq!(sp.distance(2), 0.0);
        assert!(!sp.is_reachable(0));
        assert_eq!(sp.distance(1), f64::INFINITY);
        assert_eq!(sp.predecessor(1), None);
        assert_eq!(
            sp.path_to(0).unwrap_err(),
            GraphError::Unreachable { from: 2, to: 0 }
        );
    }

    #[test]
    fn test_source_not_found() {
        let (store, g) = make_triangle();
        assert_eq!(
            run(&store, &g, 3, DistanceMode::EdgeWeight).unwrap_err(),
            GraphError::NotFound { id: 3, count: 3 }
        );
    }

    #[test]
    fn test_path_to_source_is_single_step() {
        let (store, g) = make_triangle();
        let sp = run(&store, &g, 1, DistanceMode::EdgeWeight).unwrap();
        assert_eq!(sp.path_to(1).unwrap(), vec![1]);
        assert!(matches!(sp.path_to(9), Err(GraphError::NotFound { .. })));
    }

    #[test]
    fn test_rerun_does_not_reuse_state() {
        let (store, g) = make_triangle();
        let first = run(&store, &g, 0, DistanceMode::EdgeWeight).unwrap();
        let second = run(&store, &g, 1, DistanceMode::EdgeWeight).unwrap();
        assert_eq!(second.distance(1), 0.0);
        assert_eq!(second.distance(2), 200.0);
        assert!(!second.is_reachable(0));
        // The earlier result is its own value and is unaffected
        assert_eq!(first.distance(2), 300.0);
    }

    #[test]
    fn test_store_larger_than_graph() {
        let (mut store, g) = make_triangle();
        store
            .load(vec![LocationRecord::new("Davis", "CA", -2.12, 0.67)])
            .unwrap();
        let sp = run(&store, &g, 3, DistanceMode::EdgeWeight).unwrap();
        assert_eq!(sp.distance(3), 0.0);
        assert!(!sp.is_reachable(0));
    }

    #[test]
    fn test_graph_larger_than_store_rejected() {
        let (store, _) = make_triangle();
        let g = Graph::with_locations(10);
        assert!(matches!(
            run(&store, &g, 0, DistanceMode::EdgeWeight),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let (store, g) = make_triangle();
        let err = run_with(&store, &g, 0, |_| -1.0).unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));
    }

    #[test]
    fn test_custom_cost_function() {
        let (store, g) = make_triangle();
        // Hop count
        let sp = run_with(&store, &g, 0, |_| 1.0).unwrap();
        assert_eq!(sp.distance(2), 1.0);
        assert_eq!(sp.path_to(2).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_predecessor_invariants_random_graph() {
        for mode in [DistanceMode::EdgeWeight, DistanceMode::GreatCircle] {
            let (store, g) = make_random(300, 17);
            let sp = run(&store, &g, 0, mode).unwrap();
            assert_eq!(sp.distance(0), 0.0);

            for v in 0..store.count() {
                if !sp.is_reachable(v) {
                    assert_eq!(sp.predecessor(v), None);
                    continue;
                }
                if let Some(p) = sp.predecessor(v) {
                    assert!(sp.distance(v) >= sp.distance(p));
                }
                let path = sp.path_to(v).unwrap();
                assert_eq!(path[0], 0);
                assert_eq!(*path.last().unwrap(), v);
                let total = path_cost(&store, &g, &path, mode);
                assert!(
                    (total - sp.distance(v)).abs() < 1e-6,
                    "path cost {} != distance {} for {}",
                    total,
                    sp.distance(v),
                    v
                );
            }
        }
    }

    #[test]
    fn test_optimal_against_relaxation_fixpoint() {
        // No edge can still improve a settled distance
        let (store, g) = make_random(150, 23);
        let sp = run(&store, &g, 5, DistanceMode::EdgeWeight).unwrap();
        for e in g.edges() {
            if sp.is_reachable(e.from) {
                assert!(sp.distance(e.to) <= sp.distance(e.from) + e.weight + 1e-9);
            }
        }
    }

    #[test]
    fn test_stats_counts() {
        let (store, g) = make_triangle();
        let sp = run(&store, &g, 0, DistanceMode::EdgeWeight).unwrap();
        assert_eq!(sp.stats.settled, 3);
        assert_eq!(sp.stats.relaxations, 3);
        assert_eq!(sp.records().iter().filter(|s| s.visited).count(), 3);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Location {
            id: 0,
            name: "A".into(),
            region: "X".into(),
            longitude: -2.05,
            latitude: 0.60,
        };
        let b = Location {
            id: 1,
            name: "B".into(),
            region: "X".into(),
            longitude: -1.28,
            latitude: 0.71,
        };
        assert_eq!(haversine(&a, &b), haversine(&b, &a));
        assert_eq!(haversine(&a, &a), 0.0);
    }

    #[test]
    fn test_haversine_quarter_meridian() {
        let pole = Location {
            id: 0,
            name: "Pole".into(),
            region: "N".into(),
            longitude: 0.0,
            latitude: std::f64::consts::FRAC_PI_2,
        };
        let equator = Location {
            id: 1,
            name: "Equator".into(),
            region: "E".into(),
            longitude: 0.0,
            latitude: 0.0,
        };
        let expected = EARTH_RADIUS_MILES * std::f64::consts::FRAC_PI_2;
        assert!((haversine(&pole, &equator) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_antipodal_is_finite() {
        let half_turn = EARTH_RADIUS_MILES * std::f64::consts::PI;
        for step in 0..2000 {
            let x = step as f64 * 1e-4;
            let a = Location {
                id: 0,
                name: "A".into(),
                region: "X".into(),
                longitude: 0.0,
                latitude: x,
            };
            let b = Location {
                id: 1,
                name: "B".into(),
                region: "X".into(),
                longitude: std::f64::consts::PI,
                latitude: -x,
            };
            let d = haversine(&a, &b);
            assert!(d.is_finite(), "latitude {} gave {}", x, d);
            assert!((d - half_turn).abs() < 1e-3);
        }
    }

    #[test]
    fn test_great_circle_run_over_antipodal_edge() {
        let mut store = LocationStore::new();
        store
            .load(vec![
                LocationRecord::new("Here", "X", 0.0, 0.0002),
                LocationRecord::new("There", "Y", std::f64::consts::PI, -0.0002),
            ])
            .unwrap();
        let mut g = Graph::with_locations(2);
        g.insert_edge(0, 1, 100.0).unwrap();

        let sp = run(&store, &g, 0, DistanceMode::GreatCircle).unwrap();
        assert!(sp.is_reachable(1));
        assert!((sp.distance(1) - EARTH_RADIUS_MILES * std::f64::consts::PI).abs() < 1e-3);
    }
}
