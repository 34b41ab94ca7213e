use clap::Args;

use city_graph_core::{GenerationParams, Result};

/// Adjacency generation and randomness settings.
///
/// Defaults give every city between 2 and 8 outgoing roads weighing
/// 100 to 2000.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Seed for adjacency generation and random city selection (random if unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fewest outgoing edges per city
    #[arg(long, default_value_t = 2)]
    pub min_degree: usize,

    /// Most outgoing edges per city
    #[arg(long, default_value_t = 8)]
    pub max_degree: usize,

    /// Lightest edge weight
    #[arg(long, default_value_t = 100)]
    pub min_weight: u32,

    /// Heaviest edge weight
    #[arg(long, default_value_t = 2000)]
    pub max_weight: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            seed: None,
            min_degree: params.min_out_degree,
            max_degree: params.max_out_degree,
            min_weight: params.min_weight,
            max_weight: params.max_weight,
        }
    }
}

impl Settings {
    /// Validated generation bounds.
    pub fn generation_params(&self) -> Result<GenerationParams> {
        let params = GenerationParams {
            min_out_degree: self.min_degree,
            max_out_degree: self.max_degree,
            min_weight: self.min_weight,
            max_weight: self.max_weight,
        };
        params.validate()?;
        Ok(params)
    }
}
