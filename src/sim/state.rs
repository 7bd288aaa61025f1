//! Game state and core simulation types
//!
//! One `GameState` owns everything a match needs: counters, live bubbles,
//! the dataset, geometry, the RNG and the outgoing event queue. Spawner,
//! drag controller and drop resolver all mutate it through `&mut`, so there
//! is exactly one point of mutation.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Playfield, Rect, Viewport};
use crate::dataset::FoodDataset;
use crate::level_for_score;
use crate::tuning::Tuning;

/// Which bucket a food belongs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Halal,
    Haram,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Halal => "HALAL",
            Category::Haram => "HARAM",
        }
    }

    /// Case-insensitive parse; anything but halal/haram is rejected
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HALAL" => Some(Category::Halal),
            "HARAM" => Some(Category::Haram),
            _ => None,
        }
    }
}

/// Stable bubble identifier (never reused within a session)
pub type BubbleId = u32;

/// Bubble lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Moved by the integrator
    Free,
    /// Following the pointer; the integrator skips it
    Dragging,
    /// Sorted correctly, waiting for the exit animation to finish
    Exiting,
}

/// Cosmetic bubble colours (RGBA)
pub const BUBBLE_PALETTE: [[f32; 4]; 5] = [
    [0.2, 0.6, 1.0, 1.0],
    [1.0, 0.5, 0.6, 1.0],
    [0.7, 0.4, 1.0, 1.0],
    [1.0, 0.65, 0.25, 1.0],
    [0.25, 0.8, 0.7, 1.0],
];

/// A floating food bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    /// Label shown in the bubble (food name)
    pub text: String,
    pub category: Category,
    /// Educational note shown after a correct sort
    pub note: String,
    /// Bottom-left corner
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub size: Vec2,
    /// Index into `BUBBLE_PALETTE`
    pub color: usize,
    pub state: BubbleState,
    /// Position when the current/last drag began
    pub original_pos: Vec2,
    /// Stacking order, higher is in front
    pub z: u64,
}

impl Bubble {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.state == BubbleState::Dragging
    }

    #[inline]
    pub fn is_exiting(&self) -> bool {
        self.state == BubbleState::Exiting
    }

    /// Centre the bubble on a point
    pub fn center_on(&mut self, p: Vec2) {
        self.pos = p - self.size / 2.0;
    }
}

/// A drop target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub category: Category,
    /// `None` until the presentation layer has laid it out
    pub rect: Option<Rect>,
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bubbles move and spawn
    Playing,
    /// Paused from the pause menu
    Paused,
    /// An educational note is on screen
    ShowingNote,
    /// Lives ran out
    GameOver,
}

/// Sound the presentation layer should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Correct,
    Wrong,
    GameOver,
}

/// Outcome of a pointer-up drop evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    Correct { id: BubbleId, bucket: Category },
    Wrong { id: BubbleId, bucket: Category },
}

/// Events emitted for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    BubbleSpawned {
        id: BubbleId,
        text: String,
        category: Category,
        pos: Vec2,
        size: Vec2,
        color: usize,
    },
    BubbleMoved { id: BubbleId, pos: Vec2 },
    /// Bring to front of the render order
    BubbleRaised { id: BubbleId },
    /// Start the exit animation; report back with `exit_finished`
    BubbleExiting { id: BubbleId },
    BubbleRemoved { id: BubbleId },
    Dropped { outcome: DropOutcome },
    ScoreChanged { score: u32 },
    LivesChanged { lives: u8 },
    LevelChanged { level: u32 },
    ShowNote { id: BubbleId, name: String, note: String },
    NoteDismissed { id: BubbleId },
    Sound { cue: SoundCue },
    /// Play halted (pause menu, note or game over)
    Paused,
    Resumed,
    GameOver { score: u32, level: u32 },
    /// Follows a `BubbleRemoved` for every bubble that was alive
    Restarted,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub dataset: FoodDataset,
    pub viewport: Viewport,
    /// Player lives, 0..=starting_lives
    pub lives: u8,
    pub score: u32,
    /// Always `level_for_score(score)`
    pub level: u32,
    pub phase: GamePhase,
    /// Live bubbles (sorted by id)
    pub bubbles: Vec<Bubble>,
    /// Bubbles whose educational note is pending, front is on screen
    pub notes: VecDeque<BubbleId>,
    /// Seconds until the next spawn attempt; `None` when the spawner is disarmed
    pub spawn_timer: Option<f32>,
    /// Bubble currently under the pointer
    pub dragging: Option<BubbleId>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: BubbleId,
    next_z: u64,
}

impl GameState {
    /// Create a new match; the first spawn happens on the first tick
    pub fn new(seed: u64, tuning: Tuning, dataset: FoodDataset, viewport: Viewport) -> Self {
        if dataset.is_empty() {
            log::warn!("Empty food dataset, no bubbles will spawn");
        }
        Self {
            seed,
            lives: tuning.starting_lives,
            score: 0,
            level: 1,
            phase: GamePhase::Playing,
            bubbles: Vec::new(),
            notes: VecDeque::new(),
            spawn_timer: Some(0.0),
            dragging: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
            next_z: 1,
            tuning,
            dataset,
            viewport,
        }
    }

    /// New match with default tuning and the standard 800x600 layout
    pub fn with_dataset(seed: u64, dataset: FoodDataset) -> Self {
        let tuning = Tuning::default();
        let viewport =
            Viewport::with_default_layout(tuning.fallback_width, tuning.fallback_height, &tuning);
        Self::new(seed, tuning, dataset, viewport)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> BubbleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocate the next front-most z value
    pub(crate) fn next_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// True when spawning and motion are halted
    pub fn is_paused(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Resolved geometry snapshot
    pub fn playfield(&self) -> Playfield {
        self.viewport.resolve(&self.tuning)
    }

    /// The two buckets in drop-check order (HALAL first)
    pub fn buckets(&self) -> [Bucket; 2] {
        [
            Bucket {
                category: Category::Halal,
                rect: self.viewport.halal_bucket,
            },
            Bucket {
                category: Category::Haram,
                rect: self.viewport.haram_bucket,
            },
        ]
    }

    /// Replace geometry (viewport resize / relayout)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_laid_out() {
            log::warn!("Viewport without size, using fallback playfield");
        }
        self.viewport = viewport;
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn bubble_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    /// Recompute level from score, emitting an event on change
    pub(crate) fn update_level(&mut self) {
        let level = level_for_score(self.score, self.tuning.points_per_level);
        if level != self.level {
            log::info!("Level {} -> {}", self.level, level);
            self.level = level;
            self.emit(GameEvent::LevelChanged { level });
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending events without consuming them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Ensure bubbles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bubbles.sort_by_key(|b| b.id);
    }

    /// Enter the pause menu (only from active play)
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Paused;
        log::debug!("Paused");
        self.emit(GameEvent::Paused);
    }

    /// Leave the pause menu
    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Playing;
        log::debug!("Resumed");
        self.emit(GameEvent::Resumed);
    }

    /// Move into a halted phase (note or game over)
    ///
    /// `Paused` is emitted only when leaving active play, so every `Paused`
    /// is matched by exactly one later `Resumed`.
    pub(crate) fn halt(&mut self, phase: GamePhase) {
        if self.phase == GamePhase::Playing {
            self.emit(GameEvent::Paused);
        }
        self.phase = phase;
    }

    /// Close the educational note on screen
    ///
    /// Completes removal of the noted bubble if its exit animation has not
    /// reported yet, and resumes play once no notes remain.
    pub fn dismiss_note(&mut self) {
        let Some(id) = self.notes.pop_front() else {
            return;
        };
        self.emit(GameEvent::NoteDismissed { id });
        self.remove_bubble(id);

        if let Some(&next) = self.notes.front() {
            self.emit_note(next);
        } else if self.phase == GamePhase::ShowingNote {
            self.phase = GamePhase::Playing;
            self.emit(GameEvent::Resumed);
        }
    }

    pub(crate) fn emit_note(&mut self, id: BubbleId) {
        if let Some(b) = self.bubble(id) {
            let event = GameEvent::ShowNote {
                id,
                name: b.text.clone(),
                note: b.note.clone(),
            };
            self.emit(event);
        }
    }

    /// Second phase of removal: the exit animation finished
    pub fn exit_finished(&mut self, id: BubbleId) {
        if self.bubble(id).is_some_and(Bubble::is_exiting) {
            self.remove_bubble(id);
        }
    }

    /// Delete a bubble from the live set; false if it was already gone
    pub(crate) fn remove_bubble(&mut self, id: BubbleId) -> bool {
        let before = self.bubbles.len();
        self.bubbles.retain(|b| b.id != id);
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        let removed = self.bubbles.len() != before;
        if removed {
            self.emit(GameEvent::BubbleRemoved { id });
        }
        removed
    }

    /// Reset the match in place
    pub fn restart(&mut self) {
        let removed: Vec<BubbleId> = self.bubbles.drain(..).map(|b| b.id).collect();
        for id in removed {
            self.emit(GameEvent::BubbleRemoved { id });
        }

        self.lives = self.tuning.starting_lives;
        self.score = 0;
        self.level = 1;
        self.notes.clear();
        self.dragging = None;
        self.spawn_timer = Some(0.0);
        if self.phase != GamePhase::Playing {
            self.phase = GamePhase::Playing;
            self.emit(GameEvent::Resumed);
        }

        log::info!("Restarted");
        self.emit(GameEvent::Restarted);
        self.emit(GameEvent::ScoreChanged { score: 0 });
        self.emit(GameEvent::LivesChanged { lives: self.lives });
        self.emit(GameEvent::LevelChanged { level: 1 });
    }
}
