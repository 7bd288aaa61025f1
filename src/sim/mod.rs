//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies; the presentation layer
//!   consumes `GameEvent`s and feeds back `TickInput`

pub mod autoplay;
pub mod drag;
pub mod geometry;
pub mod motion;
pub mod resolve;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autoplay::Autoplay;
pub use drag::{PointerEvent, handle_pointer, pointer_down, pointer_move, pointer_up};
pub use geometry::{Playfield, Rect, Viewport};
pub use motion::{integrate, step_bubble};
pub use resolve::{overlapping_bucket, resolve_drop, resolve_drops};
pub use spawner::{spawn_next, update_spawner};
pub use state::{
    BUBBLE_PALETTE, Bubble, BubbleId, BubbleState, Bucket, Category, DropOutcome, GameEvent,
    GamePhase, GameState, SoundCue,
};
pub use tick::{TickInput, run_frame, tick};
