//! Timed bubble creation from the food dataset
//!
//! The spawner is a single countdown in `GameState::spawn_timer`. When it
//! fires while paused it backs off and retries; otherwise it creates one
//! bubble and re-arms with a level-scaled interval.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{BUBBLE_PALETTE, Bubble, BubbleId, BubbleState, GameEvent, GameState};

/// Count the spawn timer down and fire it when due
pub fn update_spawner(state: &mut GameState, dt: f32) {
    let Some(remaining) = state.spawn_timer else {
        return;
    };
    let remaining = remaining - dt;
    if remaining > 0.0 {
        state.spawn_timer = Some(remaining);
        return;
    }
    spawn_next(state);
}

/// One spawn attempt; returns the new bubble's id if one was created
///
/// Paused: re-arm after the backoff without spawning. Empty dataset: disarm.
pub fn spawn_next(state: &mut GameState) -> Option<BubbleId> {
    if state.is_paused() {
        state.spawn_timer = Some(state.tuning.paused_spawn_backoff);
        return None;
    }

    let Some(item) = state.dataset.items().choose(&mut state.rng).cloned() else {
        state.spawn_timer = None;
        return None;
    };

    let tuning = &state.tuning;
    let field = state.playfield();
    let size = tuning.bubble_size(&item.name);

    let color = state.rng.random_range(0..BUBBLE_PALETTE.len());

    // Below the hearts bar, but never lower than just above the buckets
    let above_buckets = field.buckets_top + tuning.spawn_margin + tuning.spawn_bucket_lift;
    let start_y = (field.hearts_bar_y - size.y - tuning.spawn_margin).max(above_buckets);

    let max_x = (field.width * tuning.spawn_x_fraction) as i32;
    let max_x = if max_x >= tuning.spawn_min_x {
        max_x
    } else {
        tuning.spawn_fallback_max_x
    };
    let start_x = state.rng.random_range(tuning.spawn_min_x..=max_x.max(tuning.spawn_min_x));

    let level = state.level as f32;
    let dx = tuning.spawn_dx_choices.choose(&mut state.rng).copied().unwrap_or(1.0) + level;
    let dy = tuning.spawn_dy_choices.choose(&mut state.rng).copied().unwrap_or(2.0) + level;

    let interval = tuning.spawn_interval(state.level);
    let pos = Vec2::new(start_x as f32, start_y);

    let id = state.next_entity_id();
    let z = state.next_z();
    state.bubbles.push(Bubble {
        id,
        text: item.name.clone(),
        category: item.category,
        note: item.note,
        pos,
        vel: Vec2::new(dx, dy),
        size,
        color,
        state: BubbleState::Free,
        original_pos: pos,
        z,
    });

    log::debug!(
        "Spawned #{id} '{}' ({}) at ({}, {}) vel ({dx}, {dy}), next in {interval:.2}s",
        item.name,
        item.category.as_str(),
        pos.x,
        pos.y
    );
    state.emit(GameEvent::BubbleSpawned {
        id,
        text: item.name,
        category: item.category,
        pos,
        size,
        color,
    });

    state.spawn_timer = Some(interval);
    Some(id)
}
