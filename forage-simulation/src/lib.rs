//! Discrete-time foraging simulation: goats wander, claim the nearest free
//! cabbage, eat it down and starve without food.
//!
//! The [`World`] owns all entities. Goats and cabbages refer to each other only
//! through arena handles, so removing an entity never leaves a dangling reference.

pub mod bounds;
pub mod cabbage;
pub mod command;
pub mod config;
pub mod error;
pub mod goat;
pub mod population;
pub mod selector;
pub mod world;

use forage_core::Handle;

pub type CabbageId = Handle;
pub type GoatId = Handle;

pub use bounds::WorldBounds;
pub use cabbage::{Cabbage, NUTRITION_PER_SIZE};
pub use command::{Command, CommandOutcome};
pub use config::SimulationConfig;
pub use error::WorldError;
pub use goat::{
    Action, Goat, GoatAttributes, GoatState, DEATH_THRESHOLD, MAX_STAMINA, STAMINA_DECAY_RATE,
};
pub use population::CullReport;
pub use selector::find_nearest_unreserved;
pub use world::{TickReport, World, WorldStats};
