use std::path::{Path, PathBuf};

use city_graph_core::{
    generate_random, GenerationParams, Graph, GraphError, LocationId, LocationRecord,
    LocationStore,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::load::{self, LoadError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0} has already been loaded")]
    AlreadyLoaded(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("no cities are loaded")]
    Empty,
}

/// Outcome of a successful file load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub added: usize,
    pub total: usize,
    pub edges: usize,
}

/// The current city, and whether it was just picked at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub id: LocationId,
    pub randomly_chosen: bool,
}

/// Everything one interactive session holds: the loaded cities, their
/// adjacency, the files already read, and the user's current city.
///
/// The adjacency is regenerated over the whole store after every load;
/// `generation` counts those rebuilds.
pub struct Session {
    store: LocationStore,
    graph: Graph,
    params: GenerationParams,
    rng: StdRng,
    sources: Vec<PathBuf>,
    current: Option<LocationId>,
    generation: u64,
}

impl Session {
    pub fn new(params: GenerationParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store: LocationStore::new(),
            graph: Graph::new(),
            params,
            rng,
            sources: Vec::new(),
            current: None,
            generation: 0,
        }
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Load a city data file, then rebuild the adjacency over all cities.
    ///
    /// The same file (after path canonicalisation) is only accepted once per
    /// session; `reset()` forgets it.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadSummary, SessionError> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if self.sources.contains(&key) {
            return Err(SessionError::AlreadyLoaded(path.display().to_string()));
        }

        let records = load::read_locations(path)?;
        let summary = self.ingest(records)?;
        self.sources.push(key);
        log::info!(
            "loaded {} cities from {} ({} total)",
            summary.added,
            path.display(),
            summary.total
        );
        Ok(summary)
    }

    /// Append already-parsed records and rebuild the adjacency.
    ///
    /// Nothing is appended when the generation bounds are invalid.
    pub fn ingest(&mut self, records: Vec<LocationRecord>) -> Result<LoadSummary, SessionError> {
        self.params.validate()?;
        let ids = self.store.load(records)?;
        self.regenerate()?;
        Ok(LoadSummary {
            added: ids.len(),
            total: self.store.count(),
            edges: self.graph.edge_count(),
        })
    }

    /// Throw away all edges and draw a new random adjacency.
    pub fn regenerate(&mut self) -> Result<(), GraphError> {
        generate_random(&mut self.graph, self.store.count(), &self.params, &mut self.rng)?;
        self.generation += 1;
        log::debug!(
            "adjacency generation {}: {} edges",
            self.generation,
            self.graph.edge_count()
        );
        Ok(())
    }

    /// Forget every city, edge, loaded file and the current selection.
    pub fn reset(&mut self) {
        self.store.reset();
        self.graph.reset(0);
        self.sources.clear();
        self.current = None;
        log::info!("session cleared");
    }

    pub fn set_current(&mut self, id: LocationId) -> Result<(), GraphError> {
        self.store.get(id)?;
        self.current = Some(id);
        Ok(())
    }

    /// The current city, choosing one at random on first use.
    pub fn current(&mut self) -> Result<Selection, SessionError> {
        if let Some(id) = self.current {
            return Ok(Selection {
                id,
                randomly_chosen: false,
            });
        }
        if self.store.is_empty() {
            return Err(SessionError::Empty);
        }

        let id = self.rng.gen_range(0..self.store.count());
        self.current = Some(id);
        Ok(Selection {
            id,
            randomly_chosen: true,
        })
    }
}
