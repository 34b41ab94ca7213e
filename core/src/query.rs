use crate::dijkstra::{self, DistanceMode};
use crate::error::Result;
use crate::graph::{Degree, Graph};
use crate::location::{Location, LocationId, LocationStore};

/// A location ranked by its shortest distance from a query source.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest<'a> {
    pub location: &'a Location,
    pub distance: f64,
}

/// A single step in a reconstructed path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep<'a> {
    pub location: &'a Location,
    /// Distance from the source up to and including this step.
    pub distance: f64,
}

/// A location together with its current adjacency degree.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDetails<'a> {
    pub location: &'a Location,
    pub degree: Degree,
}

/// The `k` locations closest to `source`, nearest first.
///
/// Runs Dijkstra once. The source itself and unreachable locations are
/// excluded, so fewer than `k` results come back when fewer are reachable.
/// Locations at equal distance appear in no guaranteed relative order.
pub fn k_nearest<'a>(
    store: &'a LocationStore,
    graph: &Graph,
    source: LocationId,
    k: usize,
    mode: DistanceMode,
) -> Result<Vec<Nearest<'a>>> {
    let sp = dijkstra::run(store, graph, source, mode)?;

    let mut ranked: Vec<(LocationId, f64)> = sp
        .records()
        .iter()
        .enumerate()
        .filter(|&(id, s)| id != source && s.distance.is_finite())
        .map(|(id, s)| (id, s.distance))
        .collect();

    let by_distance = |a: &(LocationId, f64), b: &(LocationId, f64)| a.1.total_cmp(&b.1);
    if k < ranked.len() {
        if k > 0 {
            ranked.select_nth_unstable_by(k - 1, by_distance);
        }
        ranked.truncate(k);
    }
    ranked.sort_by(by_distance);

    let locations = store.as_slice();
    Ok(ranked
        .into_iter()
        .map(|(id, distance)| Nearest {
            location: &locations[id],
            distance,
        })
        .collect())
}

/// Shortest path by edge weight from `source` to `target`, both inclusive.
///
/// Fails with `NotFound` for unknown ids and `Unreachable` when no path exists.
pub fn path_to<'a>(
    store: &'a LocationStore,
    graph: &Graph,
    source: LocationId,
    target: LocationId,
) -> Result<Vec<PathStep<'a>>> {
    store.get(target)?;
    let sp = dijkstra::run(store, graph, source, DistanceMode::EdgeWeight)?;
    let ids = sp.path_to(target)?;

    let locations = store.as_slice();
    Ok(ids
        .into_iter()
        .map(|id| PathStep {
            location: &locations[id],
            distance: sp.distance(id),
        })
        .collect())
}

/// Attributes and degree counters for one location.
pub fn describe<'a>(
    store: &'a LocationStore,
    graph: &Graph,
    id: LocationId,
) -> Result<LocationDetails<'a>> {
    let location = store.get(id)?;
    Ok(LocationDetails {
        location,
        degree: graph.degree(id),
    })
}

/// Every location in `region` (case-insensitive), in id order.
pub fn in_region<'a>(
    store: &'a LocationStore,
    graph: &Graph,
    region: &str,
) -> Vec<LocationDetails<'a>> {
    store
        .search_region(region)
        .into_iter()
        .map(|location| LocationDetails {
            location,
            degree: graph.degree(location.id),
        })
        .collect()
}

/// The first location named `name` (case-insensitive).
pub fn by_name<'a>(
    store: &'a LocationStore,
    graph: &Graph,
    name: &str,
) -> Option<LocationDetails<'a>> {
    store.find_by_name(name).map(|location| LocationDetails {
        location,
        degree: graph.degree(location.id),
    })
}
