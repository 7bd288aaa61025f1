//! Pointer-driven dragging
//!
//! Per bubble: Free -> Dragging on pointer-down inside it, back to Free on
//! pointer-up, which hands over to the drop resolver exactly once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::resolve::resolve_drops;
use super::state::{BubbleId, BubbleState, DropOutcome, GameEvent, GameState};

/// A pointer event from the presentation layer, in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

/// Start dragging the front-most bubble under the pointer
///
/// Only while playing; exiting bubbles can't be grabbed.
pub fn pointer_down(state: &mut GameState, at: Vec2) -> Option<BubbleId> {
    if state.is_paused() || state.dragging.is_some() {
        return None;
    }

    let id = state
        .bubbles
        .iter()
        .filter(|b| !b.is_exiting() && b.rect().contains_point(at))
        .max_by_key(|b| b.z)
        .map(|b| b.id)?;

    let z = state.next_z();
    let bubble = state.bubble_mut(id)?;
    bubble.state = BubbleState::Dragging;
    bubble.original_pos = bubble.pos;
    bubble.z = z;
    state.dragging = Some(id);

    log::debug!("Drag start #{id}");
    state.emit(GameEvent::BubbleRaised { id });
    Some(id)
}

/// Move the dragged bubble so its centre sits under the pointer
pub fn pointer_move(state: &mut GameState, at: Vec2) {
    let Some(id) = state.dragging else {
        return;
    };
    let Some(bubble) = state.bubble_mut(id) else {
        state.dragging = None;
        return;
    };
    bubble.center_on(at);
    let pos = bubble.pos;
    state.emit(GameEvent::BubbleMoved { id, pos });
}

/// Release the dragged bubble and evaluate drops
///
/// Returns `None` when nothing was being dragged or nothing overlapped a bucket.
pub fn pointer_up(state: &mut GameState, _at: Vec2) -> Option<DropOutcome> {
    let id = state.dragging.take()?;
    if let Some(bubble) = state.bubble_mut(id) {
        if bubble.is_dragging() {
            bubble.state = BubbleState::Free;
        }
    }
    resolve_drops(state, Some(id))
}

/// Dispatch one pointer event
pub fn handle_pointer(state: &mut GameState, event: PointerEvent) -> Option<DropOutcome> {
    match event {
        PointerEvent::Down(at) => {
            pointer_down(state, at);
            None
        }
        PointerEvent::Move(at) => {
            pointer_move(state, at);
            None
        }
        PointerEvent::Up(at) => pointer_up(state, at),
    }
}
