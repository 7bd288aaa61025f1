//! PuHaRam - drag food bubbles into the HALAL or HARAM bucket
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubble motion, drag, drop scoring)
//! - `dataset`: Food items the spawner draws from
//! - `tuning`: Data-driven game balance

pub mod dataset;
pub mod sim;
pub mod tuning;

pub use dataset::{FoodDataset, FoodItem};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lives at the start of every match
    pub const STARTING_LIVES: u8 = 6;
    /// Score awarded per correct sort
    pub const POINTS_PER_CORRECT: u32 = 10;
    /// Score needed per level step
    pub const POINTS_PER_LEVEL: u32 = 50;
}

/// Level for a given score: `max(1, score / points_per_level + 1)`
#[inline]
pub fn level_for_score(score: u32, points_per_level: u32) -> u32 {
    if points_per_level == 0 {
        return 1;
    }
    (score / points_per_level + 1).max(1)
}
