use crate::error::{GraphError, Result};
use crate::location::LocationId;

/// A directed, weighted edge in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: LocationId,
    pub to: LocationId,
    pub weight: f64,
}

/// In/out degree of a single location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Degree {
    pub in_degree: u32,
    pub out_degree: u32,
}

/// Directed adjacency structure over `[0, location_count)`.
///
/// `outgoing[id]` holds the edges leaving `id` in insertion order. Degree
/// counters are derived from the edges and kept in step by `insert_edge`
/// and `clear`.
#[derive(Debug, Default)]
pub struct Graph {
    outgoing: Vec<Vec<Edge>>,
    degrees: Vec<Degree>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// An edgeless graph sized for `location_count` locations.
    pub fn with_locations(location_count: usize) -> Self {
        Self {
            outgoing: vec![Vec::new(); location_count],
            degrees: vec![Degree::default(); location_count],
            edge_count: 0,
        }
    }

    /// Drop every edge; all degree counters return to zero.
    pub fn clear(&mut self) {
        for edges in &mut self.outgoing {
            edges.clear();
        }
        self.degrees.fill(Degree::default());
        self.edge_count = 0;
    }

    /// Drop every edge and resize for `location_count` locations.
    pub fn reset(&mut self, location_count: usize) {
        self.clear();
        self.outgoing.resize(location_count, Vec::new());
        self.degrees.resize(location_count, Degree::default());
    }

    /// Add a directed edge and update both endpoints' degree counters.
    ///
    /// Both endpoints must be covered by this graph and the weight must be a
    /// finite, non-negative number. Parallel edges are not rejected here.
    pub fn insert_edge(&mut self, from: LocationId, to: LocationId, weight: f64) -> Result<()> {
        let count = self.location_count();
        for id in [from, to] {
            if id >= count {
                return Err(GraphError::NotFound { id, count });
            }
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidArgument(format!(
                "edge weight must be finite and non-negative, got {}",
                weight
            )));
        }

        self.outgoing[from].push(Edge { from, to, weight });
        self.degrees[from].out_degree += 1;
        self.degrees[to].in_degree += 1;
        self.edge_count += 1;
        Ok(())
    }

    /// Outgoing edges of `id`, in insertion order. Empty for unknown ids.
    pub fn edges_from(&self, id: LocationId) -> &[Edge] {
        self.outgoing.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn has_edge(&self, from: LocationId, to: LocationId) -> bool {
        self.edges_from(from).iter().any(|e| e.to == to)
    }

    /// Degree counters for `id`; zero for ids outside the graph.
    pub fn degree(&self, id: LocationId) -> Degree {
        self.degrees.get(id).copied().unwrap_or_default()
    }

    pub fn location_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Iterate over every edge, grouped by source id.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.outgoing.iter().flatten()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let lists = self.outgoing.len() * size_of::<Vec<Edge>>();
        let edges: usize = self
            .outgoing
            .iter()
            .map(|v| v.capacity() * size_of::<Edge>())
            .sum();
        let degrees = self.degrees.len() * size_of::<Degree>();

        lists + edges + degrees
    }
}
