//! Drop evaluation: which bucket a released bubble landed in, and what it costs
//!
//! Buckets are checked HALAL first, then HARAM. A correct sort scores and
//! starts the bubble's two-phase removal; a wrong one sends the bubble back
//! to where the drag started and costs a life.

use super::state::{
    BubbleId, BubbleState, Category, DropOutcome, GameEvent, GamePhase, GameState, SoundCue,
};

/// First bucket (in check order) the bubble overlaps
pub fn overlapping_bucket(state: &GameState, id: BubbleId) -> Option<Category> {
    let rect = state.bubble(id)?.rect();
    state
        .buckets()
        .iter()
        .find(|bucket| bucket.rect.is_some_and(|r| rect.overlaps(&r)))
        .map(|bucket| bucket.category)
}

/// Scan live, non-dragged bubbles for a bucket overlap; first match is resolved
///
/// The just-released bubble (if any) is checked first, the rest by id.
pub fn resolve_drops(state: &mut GameState, released: Option<BubbleId>) -> Option<DropOutcome> {
    state.normalize_order();
    let mut order: Vec<BubbleId> = Vec::with_capacity(state.bubbles.len());
    order.extend(released);
    order.extend(
        state
            .bubbles
            .iter()
            .filter(|b| b.state == BubbleState::Free && Some(b.id) != released)
            .map(|b| b.id),
    );

    for id in order {
        let free = state
            .bubble(id)
            .is_some_and(|b| b.state == BubbleState::Free);
        if !free {
            continue;
        }
        if let Some(bucket) = overlapping_bucket(state, id) {
            return Some(resolve_drop(state, id, bucket));
        }
    }
    None
}

/// Apply the outcome of dropping bubble `id` into `bucket`
pub fn resolve_drop(state: &mut GameState, id: BubbleId, bucket: Category) -> DropOutcome {
    let matches = state.bubble(id).is_some_and(|b| b.category == bucket);
    if matches {
        correct(state, id, bucket)
    } else {
        wrong(state, id, bucket)
    }
}

fn correct(state: &mut GameState, id: BubbleId, bucket: Category) -> DropOutcome {
    if let Some(b) = state.bubble_mut(id) {
        b.state = BubbleState::Exiting;
    }

    state.score += state.tuning.points_per_correct;
    log::debug!("Correct drop #{id} into {}, score {}", bucket.as_str(), state.score);

    let outcome = DropOutcome::Correct { id, bucket };
    state.emit(GameEvent::Dropped { outcome });
    state.emit(GameEvent::Sound { cue: SoundCue::Correct });
    state.emit(GameEvent::BubbleExiting { id });
    let score = state.score;
    state.emit(GameEvent::ScoreChanged { score });
    state.update_level();

    state.notes.push_back(id);
    if state.notes.len() == 1 {
        state.emit_note(id);
    }
    if state.phase != GamePhase::GameOver {
        state.halt(GamePhase::ShowingNote);
    }
    outcome
}

fn wrong(state: &mut GameState, id: BubbleId, bucket: Category) -> DropOutcome {
    if let Some(b) = state.bubble_mut(id) {
        b.pos = b.original_pos;
        let pos = b.pos;
        state.emit(GameEvent::BubbleMoved { id, pos });
    }

    let outcome = DropOutcome::Wrong { id, bucket };
    state.emit(GameEvent::Dropped { outcome });
    state.emit(GameEvent::Sound { cue: SoundCue::Wrong });

    if state.lives > 0 {
        state.lives -= 1;
        let lives = state.lives;
        log::debug!("Wrong drop #{id} into {}, {lives} lives left", bucket.as_str());
        state.emit(GameEvent::LivesChanged { lives });
    }

    if state.lives == 0 && state.phase != GamePhase::GameOver {
        state.halt(GamePhase::GameOver);
        log::info!("Game over: score {} level {}", state.score, state.level);
        state.emit(GameEvent::Sound { cue: SoundCue::GameOver });
        let (score, level) = (state.score, state.level);
        state.emit(GameEvent::GameOver { score, level });
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{FoodDataset, FoodItem};
    use crate::sim::drag::{pointer_down, pointer_move, pointer_up};
    use crate::sim::spawner::spawn_next;
    use crate::sim::state::Bubble;
    use glam::Vec2;
    use proptest::prelude::*;

    const HALAL_DROP: Vec2 = Vec2::new(150.0, 70.0);
    const HARAM_DROP: Vec2 = Vec2::new(600.0, 70.0);

    fn state_with(category: Category) -> (GameState, BubbleId) {
        let ds = FoodDataset::new(vec![FoodItem::new("Item", category, "Why it is so")]);
        let mut state = GameState::with_dataset(5, ds);
        let id = spawn_next(&mut state).unwrap();
        state.bubble_mut(id).unwrap().pos = Vec2::new(300.0, 300.0);
        state.drain_events();
        (state, id)
    }

    fn drag_to(state: &mut GameState, id: BubbleId, to: Vec2) -> Option<DropOutcome> {
        let grab = state.bubble(id).map(Bubble::rect).unwrap().center();
        assert_eq!(pointer_down(state, grab), Some(id));
        pointer_move(state, to);
        pointer_up(state, to)
    }

    fn spawn_at(state: &mut GameState, at: Vec2) -> BubbleId {
        let id = spawn_next(state).unwrap();
        state.bubble_mut(id).unwrap().pos = at;
        id
    }

    #[test]
    fn test_haram_on_halal_is_wrong() {
        let (mut state, id) = state_with(Category::Haram);
        let outcome = drag_to(&mut state, id, HALAL_DROP);

        assert_eq!(
            outcome,
            Some(DropOutcome::Wrong {
                id,
                bucket: Category::Halal
            })
        );
        assert_eq!(state.bubble(id).unwrap().pos, Vec2::new(300.0, 300.0));
        assert_eq!(state.lives, 5);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events().contains(&GameEvent::LivesChanged { lives: 5 }));
    }

    #[test]
    fn test_halal_on_halal_is_correct() {
        let (mut state, id) = state_with(Category::Halal);
        let outcome = drag_to(&mut state, id, HALAL_DROP);

        assert_eq!(
            outcome,
            Some(DropOutcome::Correct {
                id,
                bucket: Category::Halal
            })
        );
        assert_eq!(state.score, 10);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 6);
        assert!(state.bubble(id).unwrap().is_exiting());
        assert_eq!(state.phase, GamePhase::ShowingNote);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShowNote {
            id,
            name: "Item".into(),
            note: "Why it is so".into()
        }));
        assert!(events.contains(&GameEvent::BubbleExiting { id }));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 10 }));
    }

    #[test]
    fn test_haram_on_haram_is_correct() {
        let (mut state, id) = state_with(Category::Haram);
        let outcome = drag_to(&mut state, id, HARAM_DROP);
        assert_eq!(
            outcome,
            Some(DropOutcome::Correct {
                id,
                bucket: Category::Haram
            })
        );
    }

    #[test]
    fn test_spanning_both_buckets_checks_halal_first() {
        let (mut state, id) = state_with(Category::Haram);
        // Centred on the gap between the buckets, overlapping both
        let outcome = drag_to(&mut state, id, Vec2::new(400.0, 70.0));
        assert_eq!(
            outcome,
            Some(DropOutcome::Wrong {
                id,
                bucket: Category::Halal
            })
        );
    }

    #[test]
    fn test_two_phase_removal() {
        let (mut state, id) = state_with(Category::Halal);
        drag_to(&mut state, id, HALAL_DROP);
        assert!(state.bubble(id).is_some());

        // Exiting bubbles are neither draggable nor re-evaluated
        assert_eq!(pointer_down(&mut state, HALAL_DROP), None);
        assert_eq!(resolve_drops(&mut state, None), None);
        assert_eq!(state.score, 10);

        state.exit_finished(id);
        assert!(state.bubble(id).is_none());
        assert!(state.events().contains(&GameEvent::BubbleRemoved { id }));

        // Late duplicate report is harmless
        state.drain_events();
        state.exit_finished(id);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_dismiss_note_resumes_and_finishes_removal() {
        let (mut state, id) = state_with(Category::Halal);
        drag_to(&mut state, id, HALAL_DROP);
        state.drain_events();

        state.dismiss_note();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.bubble(id).is_none());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::NoteDismissed { id }));
        assert!(events.contains(&GameEvent::BubbleRemoved { id }));
        assert!(events.contains(&GameEvent::Resumed));

        // Animation finishing afterwards changes nothing
        state.exit_finished(id);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_score_fifty_reaches_level_two() {
        let (mut state, first) = state_with(Category::Halal);
        let mut next = Some(first);
        for _ in 0..5 {
            let id = next.take().unwrap_or_else(|| spawn_at(&mut state, Vec2::new(300.0, 300.0)));
            drag_to(&mut state, id, HALAL_DROP);
            state.dismiss_note();
        }
        assert_eq!(state.score, 50);
        assert_eq!(state.level, 2);
        assert!(state.events().contains(&GameEvent::LevelChanged { level: 2 }));

        let id = spawn_next(&mut state).unwrap();
        let b = state.bubble(id).unwrap();
        assert!([0.0, 1.0, 3.0, 4.0].contains(&b.vel.x));
        assert!([4.0, 5.0, 6.0].contains(&b.vel.y));
        assert!((state.spawn_timer.unwrap() - 2.6).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_exactly_once() {
        let (mut state, id) = state_with(Category::Haram);
        for expected in (0..6).rev() {
            drag_to(&mut state, id, HALAL_DROP);
            assert_eq!(state.lives, expected);
        }
        assert_eq!(state.phase, GamePhase::GameOver);

        // Further wrong drops (resolved directly, since grabbing is blocked)
        resolve_drop(&mut state, id, Category::Halal);
        resolve_drop(&mut state, id, Category::Halal);
        assert_eq!(state.lives, 0);

        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_scan_finds_other_bubble_in_bucket() {
        let (mut state, id) = state_with(Category::Halal);
        // A second bubble resting in the HARAM bucket
        let other = spawn_at(&mut state, Vec2::new(500.0, 40.0));
        let outcome = drag_to(&mut state, id, Vec2::new(400.0, 400.0));
        assert_eq!(
            outcome,
            Some(DropOutcome::Wrong {
                id: other,
                bucket: Category::Haram
            })
        );
        assert_eq!(state.lives, 5);
    }

    #[test]
    fn test_only_one_outcome_per_release() {
        let (mut state, id) = state_with(Category::Halal);
        spawn_at(&mut state, Vec2::new(500.0, 40.0));
        drag_to(&mut state, id, HALAL_DROP);
        let drops = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Dropped { .. }))
            .count();
        assert_eq!(drops, 1);
        assert_eq!(state.score, 10);
    }

    fn count(events: &[GameEvent], pred: fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|&e| pred(e)).count()
    }

    #[test]
    fn test_note_cycle_pairs_paused_and_resumed() {
        let (mut state, id) = state_with(Category::Halal);
        drag_to(&mut state, id, HALAL_DROP);
        state.dismiss_note();

        let events = state.drain_events();
        assert_eq!(count(&events, |e| matches!(e, GameEvent::Paused)), 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::Resumed)), 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_emits_paused() {
        let (mut state, id) = state_with(Category::Haram);
        state.lives = 1;
        drag_to(&mut state, id, HALAL_DROP);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(count(state.events(), |e| matches!(e, GameEvent::Paused)), 1);
    }

    /// Free bubble placed straight into the live set
    fn push_bubble(state: &mut GameState, category: Category) -> BubbleId {
        let id = state.next_entity_id();
        let z = state.next_z();
        let pos = Vec2::new(300.0, 300.0);
        state.bubbles.push(Bubble {
            id,
            text: "Item".into(),
            category,
            note: String::new(),
            pos,
            vel: Vec2::new(1.0, 1.0),
            size: Vec2::new(150.0, 80.0),
            color: 0,
            state: BubbleState::Free,
            original_pos: pos,
            z,
        });
        id
    }

    proptest! {
        #[test]
        fn prop_drop_sequence_keeps_counters_consistent(
            drops in prop::collection::vec((any::<bool>(), any::<bool>()), 1..60),
        ) {
            let mut state = GameState::with_dataset(5, FoodDataset::empty());
            for (is_halal, correct) in drops {
                let category = if is_halal { Category::Halal } else { Category::Haram };
                let bucket = match (category, correct) {
                    (Category::Halal, true) | (Category::Haram, false) => Category::Halal,
                    _ => Category::Haram,
                };
                let id = push_bubble(&mut state, category);
                let (score, lives) = (state.score, state.lives);

                let outcome = resolve_drop(&mut state, id, bucket);

                match outcome {
                    DropOutcome::Correct { .. } => {
                        prop_assert!(correct);
                        prop_assert_eq!(state.score, score + 10);
                        prop_assert_eq!(state.lives, lives);
                    }
                    DropOutcome::Wrong { .. } => {
                        prop_assert!(!correct);
                        prop_assert_eq!(state.score, score);
                        prop_assert_eq!(state.lives, lives.saturating_sub(1));
                    }
                }
                prop_assert_eq!(state.level, crate::level_for_score(state.score, 50));
                prop_assert_eq!(state.phase == GamePhase::GameOver, state.lives == 0);
            }
        }
    }
}
