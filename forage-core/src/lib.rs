//! Shared building blocks for the forage workspace: generational storage for
//! simulation entities and the fixed-interval trigger used to drive them.

pub mod arena;
pub mod scheduler;

pub use arena::{Arena, Handle};
pub use scheduler::Ticker;
