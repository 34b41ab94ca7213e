//! Randomized adjacency generation.
//!
//! Every location independently receives a small, bounded number of outgoing
//! edges to distinct other locations, so the fan-out stays constant as the
//! location set grows.

use rand::Rng;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::location::LocationId;

/// Bounds for random adjacency generation. Both ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub min_out_degree: usize,
    pub max_out_degree: usize,
    pub min_weight: u32,
    pub max_weight: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            min_out_degree: 2,
            max_out_degree: 8,
            min_weight: 100,
            max_weight: 2000,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_out_degree > self.max_out_degree {
            return Err(GraphError::InvalidArgument(format!(
                "min out-degree {} exceeds max out-degree {}",
                self.min_out_degree, self.max_out_degree
            )));
        }
        if self.min_weight > self.max_weight {
            return Err(GraphError::InvalidArgument(format!(
                "min weight {} exceeds max weight {}",
                self.min_weight, self.max_weight
            )));
        }
        Ok(())
    }
}

/// Replace all edges of `graph` with a fresh random adjacency over
/// `location_count` locations.
///
/// For each location `i`: draw `k` uniformly from the degree bounds, then pick
/// `k` distinct destinations by rejection sampling (redrawing self-loops and
/// already chosen targets), each with an integer weight drawn uniformly from
/// the weight bounds. `k` is clamped to `location_count - 1` so that small
/// location sets cannot stall the sampler.
pub fn generate_random<R: Rng + ?Sized>(
    graph: &mut Graph,
    location_count: usize,
    params: &GenerationParams,
    rng: &mut R,
) -> Result<()> {
    params.validate()?;
    graph.reset(location_count);

    let candidates = location_count.saturating_sub(1);
    if location_count > 0 && params.min_out_degree > candidates {
        log::warn!(
            "min out-degree {} exceeds the {} available destinations; clamping",
            params.min_out_degree,
            candidates
        );
    }

    for from in 0..location_count {
        let k = rng
            .gen_range(params.min_out_degree..=params.max_out_degree)
            .min(candidates);

        for _ in 0..k {
            let to = loop {
                let candidate: LocationId = rng.gen_range(0..location_count);
                if candidate != from && !graph.has_edge(from, candidate) {
                    break candidate;
                }
            };
            let weight = rng.gen_range(params.min_weight..=params.max_weight);
            graph.insert_edge(from, to, f64::from(weight))?;
        }
    }

    log::debug!(
        "generated {} edges over {} locations",
        graph.edge_count(),
        location_count
    );
    Ok(())
}
