//! city-graph-core: In-memory city graph engine.
//!
//! Holds a store of named locations, a randomly generated directed adjacency
//! over them, and a Dijkstra shortest-path engine that measures edges either
//! by their stored weight or by great-circle distance between endpoints.
//! Nearest-location ranking and path reconstruction are built on top.
//!
//! No I/O and no formatting: callers hand in parsed records and receive
//! structured results.

mod dijkstra;
mod error;
mod generate;
mod graph;
mod location;
mod query;

pub use dijkstra::{
    haversine, run, run_with, DistanceMode, RunStats, Scratch, ShortestPaths,
    EARTH_RADIUS_MILES,
};
pub use error::{GraphError, Result};
pub use generate::{generate_random, GenerationParams};
pub use graph::{Degree, Edge, Graph};
pub use location::{Location, LocationId, LocationRecord, LocationStore};
pub use query::{
    by_name, describe, in_region, k_nearest, path_to, LocationDetails, Nearest, PathStep,
};
