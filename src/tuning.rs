//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a JSON file can retune
//! the game without a rebuild. Missing fields fall back to the defaults.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::{POINTS_PER_CORRECT, POINTS_PER_LEVEL, STARTING_LIVES};

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Lives at match start (also the cap)
    pub starting_lives: u8,
    /// Score per correct sort
    pub points_per_correct: u32,
    /// Score per level step
    pub points_per_level: u32,

    // === Motion ===
    /// Horizontal bounce margin from the playfield edges
    pub edge_margin: f32,
    /// Gap kept between bubble top and playfield top
    pub top_margin: f32,
    /// Gap kept between bubble bottom and the bucket tops
    pub bucket_clearance: f32,
    /// Floor as a fraction of playfield height
    pub floor_fraction: f32,
    /// Vertical speed forced at the floor when the bubble was at rest (plus level)
    pub floor_kick: f32,

    // === Spawning ===
    /// Margin used for spawn height
    pub spawn_margin: f32,
    /// Extra lift above the buckets for spawns
    pub spawn_bucket_lift: f32,
    /// Leftmost spawn x
    pub spawn_min_x: i32,
    /// Rightmost spawn x as a fraction of playfield width
    pub spawn_x_fraction: f32,
    /// Rightmost spawn x when the playfield is too narrow
    pub spawn_fallback_max_x: i32,
    /// Horizontal speed choices (level is added)
    pub spawn_dx_choices: Vec<f32>,
    /// Vertical speed choices (level is added)
    pub spawn_dy_choices: Vec<f32>,
    /// Spawn interval at level 0 (seconds)
    pub base_spawn_interval: f32,
    /// Interval reduction per level (seconds)
    pub spawn_interval_step: f32,
    /// Shortest spawn interval (seconds)
    pub min_spawn_interval: f32,
    /// Retry delay when the spawner fires while paused (seconds)
    pub paused_spawn_backoff: f32,

    // === Bubble size ===
    pub bubble_min_width: f32,
    pub bubble_max_width: f32,
    pub bubble_height: f32,
    /// Horizontal padding around the label
    pub bubble_text_padding: f32,
    /// Estimated glyph advance for width sizing
    pub glyph_width: f32,

    // === Layout ===
    /// Playfield size used when the viewport has not been laid out
    pub fallback_width: f32,
    pub fallback_height: f32,
    /// Hearts bar y as a fraction of playfield height
    pub hearts_bar_fraction: f32,
    /// Bucket area height as a fraction of playfield height
    pub bucket_area_fraction: f32,
    /// Bucket area padding and spacing
    pub bucket_padding: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            points_per_correct: POINTS_PER_CORRECT,
            points_per_level: POINTS_PER_LEVEL,

            edge_margin: 10.0,
            top_margin: 20.0,
            bucket_clearance: 8.0,
            floor_fraction: 0.28,
            floor_kick: 2.0,

            spawn_margin: 12.0,
            spawn_bucket_lift: 10.0,
            spawn_min_x: 50,
            spawn_x_fraction: 0.75,
            spawn_fallback_max_x: 300,
            spawn_dx_choices: vec![-2.0, -1.0, 1.0, 2.0],
            spawn_dy_choices: vec![2.0, 3.0, 4.0],
            base_spawn_interval: 3.0,
            spawn_interval_step: 0.2,
            min_spawn_interval: 0.5,
            paused_spawn_backoff: 0.5,

            bubble_min_width: 150.0,
            bubble_max_width: 380.0,
            bubble_height: 80.0,
            bubble_text_padding: 40.0,
            glyph_width: 15.0,

            fallback_width: 800.0,
            fallback_height: 600.0,
            hearts_bar_fraction: 0.88,
            bucket_area_fraction: 0.25,
            bucket_padding: 20.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("invalid tuning JSON")?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Seconds between spawns at the given level
    pub fn spawn_interval(&self, level: u32) -> f32 {
        (self.base_spawn_interval - level as f32 * self.spawn_interval_step)
            .max(self.min_spawn_interval)
    }

    /// Bubble size for a label
    pub fn bubble_size(&self, text: &str) -> glam::Vec2 {
        let width = text.chars().count() as f32 * self.glyph_width + self.bubble_text_padding;
        glam::Vec2::new(
            width.clamp(self.bubble_min_width, self.bubble_max_width),
            self.bubble_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_scales_with_level() {
        let t = Tuning::default();
        assert!((t.spawn_interval(1) - 2.8).abs() < 1e-5);
        assert!((t.spawn_interval(2) - 2.6).abs() < 1e-5);
        // Floors at the minimum
        assert!((t.spawn_interval(50) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bubble_size_clamped() {
        let t = Tuning::default();
        assert_eq!(t.bubble_size("Tea").x, 150.0);
        assert_eq!(t.bubble_size(&"x".repeat(100)).x, 380.0);
        assert_eq!(t.bubble_size("Chicken Satay").y, 80.0);
        let mid = t.bubble_size("Grilled chicken");
        assert!(mid.x > 150.0 && mid.x < 380.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "starting_lives": 3, "edge_margin": 5.0 }"#).unwrap();
        assert_eq!(t.starting_lives, 3);
        assert_eq!(t.edge_margin, 5.0);
        assert_eq!(t.points_per_correct, 10);
        assert_eq!(t.spawn_dy_choices, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
