//! Food Memory deck
//!
//! Six foods, two cards each. Shuffling is a uniform Fisher-Yates pass driven
//! by a seeded PCG stream, so a seed reproduces the same layout.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MEMORY_CARDS, MEMORY_PAIRS};

/// Card faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Food {
    Fries,
    Cheeseburger,
    IceCream,
    Pizza,
    Milkshake,
    Hotdog,
}

impl Food {
    pub const ALL: [Food; MEMORY_PAIRS] = [
        Food::Fries,
        Food::Cheeseburger,
        Food::IceCream,
        Food::Pizza,
        Food::Milkshake,
        Food::Hotdog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Food::Fries => "fries",
            Food::Cheeseburger => "cheeseburger",
            Food::IceCream => "ice-cream",
            Food::Pizza => "pizza",
            Food::Milkshake => "milkshake",
            Food::Hotdog => "hotdog",
        }
    }

    /// Face image asset
    pub fn image(&self) -> String {
        format!("{}.png", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("a deck needs exactly 12 cards, got {0}")]
    WrongSize(usize),
    #[error("{0} must appear exactly twice")]
    Unpaired(&'static str),
}

/// One card in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable identity (index in the unshuffled deck)
    pub id: u32,
    pub face: Food,
    /// Slot in the current layout
    pub position: usize,
}

/// The 12-card layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Unshuffled deck: every food once, then every food again
    pub fn ordered() -> Self {
        let faces: Vec<Food> = Food::ALL.iter().chain(Food::ALL.iter()).copied().collect();
        Self::place(
            faces
                .into_iter()
                .enumerate()
                .map(|(i, face)| (i as u32, face))
                .collect(),
        )
    }

    /// Uniformly permuted deck
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<(u32, Food)> = Self::ordered()
            .cards
            .into_iter()
            .map(|c| (c.id, c.face))
            .collect();
        cards.shuffle(rng);
        Self::place(cards)
    }

    /// Deck with a fixed layout; each food must appear exactly twice
    pub fn from_faces(faces: &[Food]) -> Result<Self, DeckError> {
        if faces.len() != MEMORY_CARDS {
            return Err(DeckError::WrongSize(faces.len()));
        }
        for food in Food::ALL {
            if faces.iter().filter(|&&f| f == food).count() != 2 {
                return Err(DeckError::Unpaired(food.as_str()));
            }
        }
        Ok(Self::place(
            faces
                .iter()
                .enumerate()
                .map(|(i, &face)| (i as u32, face))
                .collect(),
        ))
    }

    fn place(cards: Vec<(u32, Food)>) -> Self {
        Self {
            cards: cards
                .into_iter()
                .enumerate()
                .map(|(position, (id, face))| Card { id, face, position })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_ordered_deck() {
        let deck = Deck::ordered();
        assert_eq!(deck.len(), 12);
        assert_eq!(deck.get(0).map(|c| c.face), Some(Food::Fries));
        assert_eq!(deck.get(6).map(|c| c.face), Some(Food::Fries));
        assert_eq!(deck.get(11).map(|c| c.face), Some(Food::Hotdog));
    }

    #[test]
    fn test_shuffle_keeps_multiset() {
        let mut rng = Pcg32::seed_from_u64(7);
        let deck = Deck::shuffled(&mut rng);
        let mut counts: HashMap<Food, usize> = HashMap::new();
        for (i, card) in deck.cards().iter().enumerate() {
            assert_eq!(card.position, i);
            *counts.entry(card.face).or_default() += 1;
        }
        assert_eq!(counts.len(), MEMORY_PAIRS);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let a = Deck::shuffled(&mut Pcg32::seed_from_u64(42));
        let b = Deck::shuffled(&mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_is_roughly_uniform() {
        // Card 0 should land in every slot about equally often
        let mut rng = Pcg32::seed_from_u64(1);
        let mut slots = [0u32; MEMORY_CARDS];
        let trials = 12_000;
        for _ in 0..trials {
            let deck = Deck::shuffled(&mut rng);
            if let Some(card) = deck.cards().iter().find(|c| c.id == 0) {
                slots[card.position] += 1;
            }
        }
        for count in slots {
            assert!((700..1300).contains(&count), "slot count {count}");
        }
    }

    #[test]
    fn test_from_faces_validates() {
        assert_eq!(
            Deck::from_faces(&[Food::Pizza; 3]),
            Err(DeckError::WrongSize(3))
        );
        let mut faces = [Food::Fries; 12];
        faces[..6].copy_from_slice(&Food::ALL);
        assert_eq!(Deck::from_faces(&faces), Err(DeckError::Unpaired("fries")));
    }
}
