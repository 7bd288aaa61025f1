//! Demo player
//!
//! Produces the inputs a player would: grab the lowest free bubble, drop it
//! on its bucket, read (dismiss) the note. Every `mistake_every`-th drop goes
//! to the wrong bucket so lives get exercised too.

use glam::Vec2;

use super::drag::PointerEvent;
use super::state::{BubbleState, Category, GameEvent, GamePhase, GameState};
use super::tick::TickInput;

/// Ticks between two grabs
const GRAB_COOLDOWN_TICKS: u32 = 45;
/// Ticks a note stays open before the demo player dismisses it
const NOTE_READ_TICKS: u32 = 90;

#[derive(Debug, Clone, Default)]
pub struct Autoplay {
    /// Drop into the wrong bucket on every n-th drop (0 = never)
    pub mistake_every: u32,
    /// Restart automatically after game over
    pub restart_on_game_over: bool,
    drops: u32,
    cooldown: u32,
    reading: u32,
}

impl Autoplay {
    pub fn new(mistake_every: u32, restart_on_game_over: bool) -> Self {
        Self {
            mistake_every,
            restart_on_game_over,
            ..Default::default()
        }
    }

    /// Number of drops performed so far
    pub fn drops(&self) -> u32 {
        self.drops
    }

    /// Decide the input for the next tick
    ///
    /// `events` are the events the presentation layer saw since the last call;
    /// exit animations are reported finished immediately.
    pub fn next_input(&mut self, state: &GameState, events: &[GameEvent]) -> TickInput {
        let mut input = TickInput {
            exits_finished: events
                .iter()
                .filter_map(|e| match e {
                    GameEvent::BubbleExiting { id } => Some(*id),
                    _ => None,
                })
                .collect(),
            ..Default::default()
        };

        match state.phase {
            GamePhase::ShowingNote => {
                self.reading += 1;
                if self.reading >= NOTE_READ_TICKS {
                    self.reading = 0;
                    input.dismiss_note = true;
                }
            }
            GamePhase::GameOver => input.restart = self.restart_on_game_over,
            GamePhase::Paused => input.pause = true,
            GamePhase::Playing => {
                if self.cooldown > 0 {
                    self.cooldown -= 1;
                } else if let Some(pointer) = self.plan_drag(state) {
                    input.pointer = pointer;
                    self.cooldown = GRAB_COOLDOWN_TICKS;
                }
            }
        }
        input
    }

    /// Down/Move/Up that carries the lowest free bubble into a bucket
    ///
    /// Bubbles whose grab point is covered by another bubble are skipped so
    /// the pointer lands on the intended one.
    fn plan_drag(&mut self, state: &GameState) -> Option<Vec<PointerEvent>> {
        let mut candidates: Vec<_> = state
            .bubbles
            .iter()
            .filter(|b| b.state == BubbleState::Free)
            .collect();
        candidates.sort_by(|a, b| a.pos.y.total_cmp(&b.pos.y).then(a.id.cmp(&b.id)));

        // Grab where the bubble will be once this tick's motion has run
        let (bubble, grab) = candidates.into_iter().find_map(|bubble| {
            let grab = bubble.rect().center() + bubble.vel;
            let covered = state.bubbles.iter().any(|other| {
                if other.id == bubble.id || other.is_exiting() {
                    return false;
                }
                let slack = 2.0 * other.vel.abs().max_element() + 2.0;
                let mut reach = other.rect();
                reach.pos -= Vec2::splat(slack);
                reach.size += Vec2::splat(slack * 2.0);
                reach.contains_point(grab)
            });
            (!covered).then_some((bubble, grab))
        })?;

        let mistake = self.mistake_every > 0 && (self.drops + 1) % self.mistake_every == 0;
        let target = match (bubble.category, mistake) {
            (Category::Halal, false) | (Category::Haram, true) => Category::Halal,
            _ => Category::Haram,
        };
        let drop_at = bucket_center(state, target)?;
        self.drops += 1;

        log::debug!(
            "Autoplay: #{} '{}' -> {}{}",
            bubble.id,
            bubble.text,
            target.as_str(),
            if mistake { " (on purpose)" } else { "" }
        );
        Some(vec![
            PointerEvent::Down(grab),
            PointerEvent::Move(drop_at),
            PointerEvent::Up(drop_at),
        ])
    }
}

/// Centre of the bucket holding `category`, if laid out
pub fn bucket_center(state: &GameState, category: Category) -> Option<Vec2> {
    state
        .buckets()
        .iter()
        .find(|b| b.category == category)
        .and_then(|b| b.rect)
        .map(|r| r.center())
}
