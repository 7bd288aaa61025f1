//! Per-tick bubble motion
//!
//! Free bubbles advance by their velocity, then get corrected in a fixed
//! order: side walls, the bucket floor, the top edge.

use super::geometry::Playfield;
use super::state::{Bubble, BubbleState, GameEvent, GameState};
use crate::tuning::Tuning;

/// Advance one bubble by a single tick and apply boundary corrections
pub fn step_bubble(bubble: &mut Bubble, field: &Playfield, tuning: &Tuning, level: u32) {
    bubble.pos += bubble.vel;

    // Side walls
    let margin = tuning.edge_margin;
    if bubble.pos.x < margin {
        bubble.pos.x = margin;
        bubble.vel.x = -bubble.vel.x;
    }
    if bubble.pos.x + bubble.size.x > field.width - margin {
        bubble.pos.x = field.width - margin - bubble.size.x;
        bubble.vel.x = -bubble.vel.x;
    }

    // Keep out of the bucket zone
    let min_y = field.min_allowed_y(tuning);
    if bubble.pos.y < min_y {
        bubble.pos.y = min_y;
        if bubble.vel.y <= 0.0 {
            bubble.vel.y = if bubble.vel.y != 0.0 {
                bubble.vel.y.abs()
            } else {
                tuning.floor_kick + level as f32
            };
        }
    }

    // Top edge
    let ceiling = field.height - tuning.top_margin;
    if bubble.pos.y + bubble.size.y > ceiling {
        bubble.pos.y = ceiling - bubble.size.y;
        if bubble.vel.y >= 0.0 {
            bubble.vel.y = -bubble.vel.y;
        }
    }
}

/// Advance every free bubble; dragged and exiting bubbles stay put
pub fn integrate(state: &mut GameState) {
    let field = state.playfield();
    let level = state.level;
    let mut moved = Vec::new();

    for bubble in state.bubbles.iter_mut() {
        if bubble.state != BubbleState::Free {
            continue;
        }
        step_bubble(bubble, &field, &state.tuning, level);
        moved.push(GameEvent::BubbleMoved {
            id: bubble.id,
            pos: bubble.pos,
        });
    }

    state.events.extend(moved);
}
