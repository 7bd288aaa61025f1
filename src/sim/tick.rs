//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::drag::{PointerEvent, handle_pointer};
use super::geometry::Viewport;
use super::motion::integrate;
use super::spawner::update_spawner;
use super::state::{BubbleId, DropOutcome, GamePhase, GameState};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events since the last tick, in order
    pub pointer: Vec<PointerEvent>,
    /// Pause toggle (pause menu)
    pub pause: bool,
    /// Close the educational note on screen
    pub dismiss_note: bool,
    /// Exit animations that completed since the last tick
    pub exits_finished: Vec<BubbleId>,
    /// Restart the match
    pub restart: bool,
    /// New geometry after a layout pass or resize
    pub viewport: Option<Viewport>,
}

impl TickInput {
    /// Clear one-shot inputs after they have been applied
    pub fn clear_one_shots(&mut self) {
        self.pointer.clear();
        self.pause = false;
        self.dismiss_note = false;
        self.exits_finished.clear();
        self.restart = false;
        self.viewport = None;
    }
}

/// Advance the game state by one fixed timestep
///
/// Motion for the tick completes before any pointer event is handled, so
/// drop evaluation always sees a fully updated bubble set. Returns the drop
/// outcomes produced by pointer-up events this tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<DropOutcome> {
    if let Some(viewport) = input.viewport {
        state.set_viewport(viewport);
    }

    if input.restart {
        state.restart();
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => state.pause(),
            GamePhase::Paused => state.resume(),
            _ => {}
        }
    }

    for &id in &input.exits_finished {
        state.exit_finished(id);
    }
    if input.dismiss_note {
        state.dismiss_note();
    }

    state.time_ticks += 1;

    // Spawner runs paused or not; it backs off on its own
    update_spawner(state, dt);

    if !state.is_paused() {
        integrate(state);
    }

    input
        .pointer
        .iter()
        .filter_map(|&event| handle_pointer(state, event))
        .collect()
}

/// Run as many fixed ticks as `frame_dt` covers (capped at `MAX_SUBSTEPS`)
///
/// One-shot inputs apply to the first substep only. Returns the number of
/// ticks run and any drop outcomes.
pub fn run_frame(
    state: &mut GameState,
    input: &mut TickInput,
    frame_dt: f32,
    accumulator: &mut f32,
) -> (u32, Vec<DropOutcome>) {
    let frame_dt = frame_dt.clamp(0.0, 0.25);
    *accumulator += frame_dt;

    let mut substeps = 0;
    let mut outcomes = Vec::new();
    while *accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
        outcomes.extend(tick(state, input, SIM_DT));
        *accumulator -= SIM_DT;
        substeps += 1;

        input.clear_one_shots();
    }
    if substeps == MAX_SUBSTEPS && *accumulator >= SIM_DT {
        log::debug!("Dropping {:.3}s of simulation backlog", *accumulator);
        *accumulator = 0.0;
    }

    (substeps, outcomes)
}
