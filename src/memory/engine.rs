//! Food Memory engine
//!
//! Turn-based: the player reveals two cards, the engine waits
//! [`RESOLVE_DELAY_MS`] so the second face can be seen, then either commits
//! the pair or flips both back. Only the elapsed-time counter is clocked.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::deck::{Deck, Food};
use crate::clock::{ClockState, GameClock, OneShot, TimerToken};
use crate::consts::{CLOCK_TICK_MS, MEMORY_PAIRS, RESOLVE_DELAY_MS};

/// Derived per-card state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
}

/// Turn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPhase {
    /// Nothing picked this turn
    Idle,
    /// One card face up
    OnePicked,
    /// Two cards face up, waiting for resolution
    Resolving,
    /// Every pair found
    Finished,
}

/// What a pick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Ignored,
    Revealed,
    /// Second card of the turn; resolution fires after the delay
    ResolutionScheduled(TimerToken),
}

/// Result of comparing a two-card pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Matched { first: usize, second: usize, face: Food },
    Mismatched { first: usize, second: usize },
}

/// Card as shown to the player; the face is only exposed while revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub position: usize,
    pub state: CardState,
    pub face: Option<Food>,
}

/// Read-only view of a Food Memory run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub cards: Vec<CardView>,
    pub phase: MemoryPhase,
    pub paused: bool,
    pub score: u32,
    pub elapsed_secs: u32,
}

/// A mounted Food Memory instance
#[derive(Debug, Clone)]
pub struct MemoryMatch {
    deck: Deck,
    rng: Pcg32,
    /// Positions picked this turn (at most two)
    picked: Vec<usize>,
    /// Committed pairs
    matched: Vec<[usize; 2]>,
    finished: bool,
    paused: bool,
    elapsed_secs: u32,
    wall_clock: GameClock,
    resolution: OneShot,
}

impl MemoryMatch {
    /// Shuffle a fresh deck from `seed` and start the clock
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        Self::from_parts(deck, rng)
    }

    /// Start with a fixed layout; later resets still shuffle from `seed`
    pub fn with_deck(deck: Deck, seed: u64) -> Self {
        Self::from_parts(deck, Pcg32::seed_from_u64(seed))
    }

    fn from_parts(deck: Deck, rng: Pcg32) -> Self {
        let mut engine = Self {
            deck,
            rng,
            picked: Vec::with_capacity(2),
            matched: Vec::with_capacity(MEMORY_PAIRS),
            finished: false,
            paused: false,
            elapsed_secs: 0,
            wall_clock: GameClock::new(CLOCK_TICK_MS),
            resolution: OneShot::new(RESOLVE_DELAY_MS),
        };
        engine.wall_clock.start();
        engine
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> MemoryPhase {
        if self.finished {
            return MemoryPhase::Finished;
        }
        match self.picked.len() {
            0 => MemoryPhase::Idle,
            1 => MemoryPhase::OnePicked,
            _ => MemoryPhase::Resolving,
        }
    }

    /// Matched pair count
    pub fn score(&self) -> u32 {
        self.matched.len() as u32
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True while mounted and not yet finished
    pub fn is_active(&self) -> bool {
        self.wall_clock.state() != ClockState::Stopped && !self.finished
    }

    pub fn picked(&self) -> &[usize] {
        &self.picked
    }

    pub fn is_matched(&self, position: usize) -> bool {
        self.matched.iter().any(|pair| pair.contains(&position))
    }

    pub fn card_state(&self, position: usize) -> CardState {
        if self.is_matched(position) {
            CardState::Matched
        } else if self.picked.contains(&position) {
            CardState::Revealed
        } else {
            CardState::Hidden
        }
    }

    /// Score line text
    pub fn result_text(&self) -> String {
        if self.finished {
            "Congratulations! You found them all!".to_string()
        } else {
            self.score().to_string()
        }
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        let cards = self
            .deck
            .cards()
            .iter()
            .map(|card| {
                let state = self.card_state(card.position);
                CardView {
                    position: card.position,
                    state,
                    face: (state == CardState::Revealed).then_some(card.face),
                }
            })
            .collect();
        MemorySnapshot {
            cards,
            phase: self.phase(),
            paused: self.paused,
            score: self.score(),
            elapsed_secs: self.elapsed_secs,
        }
    }

    /// Reveal a card. Ignored when finished, paused, out of range, already
    /// matched, already picked, or when two cards are already up.
    pub fn pick_card(&mut self, position: usize) -> PickOutcome {
        if self.finished
            || self.paused
            || position >= self.deck.len()
            || self.picked.len() >= 2
            || self.picked.contains(&position)
            || self.is_matched(position)
        {
            return PickOutcome::Ignored;
        }

        self.picked.push(position);
        if self.picked.len() < 2 {
            return PickOutcome::Revealed;
        }

        let token = self.resolution.schedule();
        PickOutcome::ResolutionScheduled(token)
    }

    /// Compare the two picked cards. A token from before a reset or unmount
    /// is stale and does nothing.
    pub fn resolve(&mut self, token: TimerToken) -> Option<Resolution> {
        if !self.resolution.is_current(token) || self.picked.len() != 2 {
            log::debug!("Ignoring stale memory resolution");
            return None;
        }

        let (first, second) = (self.picked[0], self.picked[1]);
        self.picked.clear();

        let face_a = self.deck.get(first).map(|c| c.face);
        let face_b = self.deck.get(second).map(|c| c.face);

        let resolution = match (face_a, face_b) {
            (Some(a), Some(b)) if first != second && a == b => {
                self.matched.push([first, second]);
                Resolution::Matched {
                    first,
                    second,
                    face: a,
                }
            }
            _ => Resolution::Mismatched { first, second },
        };

        if self.matched.len() == MEMORY_PAIRS {
            self.finished = true;
            log::info!(
                "Food Memory finished: {} pairs in {}s",
                self.matched.len(),
                self.elapsed_secs
            );
        }

        Some(resolution)
    }

    /// Feed host time into the elapsed clock and the resolution timer.
    /// Pausing freezes only the elapsed time; a scheduled resolution still
    /// fires on time.
    pub fn advance(&mut self, elapsed_ms: u32) -> Option<Resolution> {
        for _ in 0..self.wall_clock.advance(elapsed_ms) {
            if !self.paused && !self.finished {
                self.elapsed_secs += 1;
            }
        }

        let token = self.resolution.advance(elapsed_ms)?;
        self.resolve(token)
    }

    pub fn toggle_pause(&mut self) {
        if !self.finished {
            self.paused = !self.paused;
        }
    }

    /// Reshuffle and start over, discarding any pending resolution
    pub fn reset(&mut self) {
        self.resolution.cancel();
        self.deck = Deck::shuffled(&mut self.rng);
        self.picked.clear();
        self.matched.clear();
        self.finished = false;
        self.paused = false;
        self.elapsed_secs = 0;
        self.wall_clock.start();
        log::info!("Food Memory reset");
    }

    /// Unmount: stop the clock and cancel any pending resolution
    pub fn stop(&mut self) {
        self.resolution.cancel();
        self.wall_clock.stop();
    }

    pub fn suspend(&mut self) {
        self.wall_clock.pause();
    }

    pub fn unsuspend(&mut self) {
        self.wall_clock.resume();
    }
}
