use crate::bounds::WorldBounds;

/// Engine-side configuration value.
///
/// Built by the caller from an already validated configuration source; the
/// engine does not re-check these values.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub width: f32,
    pub height: f32,
    pub initial_goats: usize,
    pub initial_cabbages: usize,
    /// Discrete distribution of how many cabbages one spawn trigger adds.
    pub spawn_choices: Vec<u32>,
    /// Minimum distance from the edges for randomly placed entities.
    pub spawn_margin: f32,
    /// Inclusive range for the size of randomly created cabbages.
    pub cabbage_size_range: (f32, f32),
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.width, self.height)
    }

    /// The same configuration without any initial population.
    pub fn empty(width: f32, height: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            initial_goats: 0,
            initial_cabbages: 0,
            seed: Some(seed),
            ..Self::default()
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1500.0,
            height: 800.0,
            initial_goats: 10,
            initial_cabbages: 20,
            spawn_choices: vec![1, 2, 3, 4],
            spawn_margin: 50.0,
            cabbage_size_range: (10.0, 30.0),
            seed: None,
        }
    }
}
