//! Screen-space geometry for bubbles, buckets and the playfield
//!
//! Coordinates are y-up: `min.y` is the bottom edge, `max().y` the top.
//! Buckets sit along the bottom of the playfield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Axis-aligned rectangle given by its bottom-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Point inside test, edges included
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// Overlap test, touching edges count as overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.top() < other.bottom()
            || self.bottom() > other.top())
    }
}

/// Geometry reported by the presentation layer
///
/// Any part may be missing before the first layout pass; the simulation then
/// falls back to tuning defaults instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Playfield width/height
    pub size: Option<Vec2>,
    pub halal_bucket: Option<Rect>,
    pub haram_bucket: Option<Rect>,
    /// Bottom edge of the hearts (lives) bar
    pub hearts_bar_y: Option<f32>,
}

impl Viewport {
    /// Standard layout: buckets side by side in the bottom quarter, hearts near the top
    pub fn with_default_layout(width: f32, height: f32, tuning: &Tuning) -> Self {
        let pad = tuning.bucket_padding;
        let area_h = height * tuning.bucket_area_fraction;
        let bucket_w = ((width - pad * 3.0) / 2.0).max(0.0);
        let bucket_h = (area_h - pad * 2.0).max(0.0);

        Self {
            size: Some(Vec2::new(width, height)),
            halal_bucket: Some(Rect::new(pad, pad, bucket_w, bucket_h)),
            haram_bucket: Some(Rect::new(pad * 2.0 + bucket_w, pad, bucket_w, bucket_h)),
            hearts_bar_y: Some(height * tuning.hearts_bar_fraction),
        }
    }

    /// Resolve into the snapshot the simulation works against
    pub fn resolve(&self, tuning: &Tuning) -> Playfield {
        let size = match self.size {
            Some(s) if s.x > 0.0 && s.y > 0.0 => s,
            _ => Vec2::new(tuning.fallback_width, tuning.fallback_height),
        };

        let buckets_top = [self.halal_bucket, self.haram_bucket]
            .iter()
            .flatten()
            .map(Rect::top)
            .fold(None, |acc: Option<f32>, t| Some(acc.map_or(t, |a| a.max(t))))
            .unwrap_or(0.0);

        Playfield {
            width: size.x,
            height: size.y,
            buckets_top,
            hearts_bar_y: self.hearts_bar_y.unwrap_or(0.0).max(0.0),
        }
    }

    /// True when the playfield size is known
    pub fn is_laid_out(&self) -> bool {
        matches!(self.size, Some(s) if s.x > 0.0 && s.y > 0.0)
    }
}

/// Resolved playfield snapshot used by motion and spawning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    /// Highest top edge of the two buckets (0 when not laid out)
    pub buckets_top: f32,
    pub hearts_bar_y: f32,
}

impl Playfield {
    /// Lowest y a free bubble's bottom edge may reach
    pub fn min_allowed_y(&self, tuning: &Tuning) -> f32 {
        (self.buckets_top + tuning.bucket_clearance).max(self.height * tuning.floor_fraction)
    }
}
