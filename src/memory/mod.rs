//! Food Memory pairs-matching game

pub mod deck;
pub mod engine;

pub use deck::{Card, Deck, DeckError, Food};
pub use engine::{
    CardState, CardView, MemoryMatch, MemoryPhase, MemorySnapshot, PickOutcome, Resolution,
};
