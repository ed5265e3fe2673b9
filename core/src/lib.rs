//! Minefield game-logic engine.
//!
//! The crate owns everything between the pointer and the pixels: unbiased
//! mine sampling, safe-first-click relocation, flood-fill and chord opens,
//! flagging, win/loss detection, and the press/drag/release gesture machine.
//! Rendering, windowing and timers stay on the host's side of the fence; the
//! host feeds gestures in and listens for [`GameEvent`] notifications coming
//! back.

use serde::{Deserialize, Serialize};

pub use board::{Board, GameState};
pub use cell::CellView;
pub use controller::{EventSink, GameController, GameEvent, PointerButtons, PressTarget};
pub use error::{GameError, Result};
pub use sampler::{BernoulliSampler, MineSampler};
pub use types::{CellCount, Coord, Coord2};

mod board;
mod cell;
mod controller;
mod engine;
mod error;
mod sampler;
mod types;

/// Geometry of a game to deal: grid size and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const BEGINNER: Self = Self {
        width: 9,
        height: 9,
        mines: 10,
    };
    pub const INTERMEDIATE: Self = Self {
        width: 16,
        height: 16,
        mines: 40,
    };
    pub const EXPERT: Self = Self {
        width: 30,
        height: 16,
        mines: 99,
    };

    /// Custom geometry; out-of-range values are clamped, never rejected.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
        .clamped()
    }

    /// The XP-era caps: 9..=30 wide, 9..=24 tall, 10..=(w-1)(h-1) mines.
    pub fn clamped(self) -> Self {
        let width = self.width.clamp(9, 30);
        let height = self.height.clamp(9, 24);
        let max_mines = (CellCount::from(width) - 1) * (CellCount::from(height) - 1);
        let mines = self.mines.clamp(10, max_mines);
        Self {
            width,
            height,
            mines,
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        types::cell_total(self.width, self.height)
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether the caller owes the display a refresh.
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of an open operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    Opened,
    Exploded,
    Won,
}

impl OpenOutcome {
    /// Whether the caller owes the display a refresh.
    pub const fn has_update(self) -> bool {
        use OpenOutcome::*;
        match self {
            NoChange => false,
            Opened => true,
            Exploded => true,
            Won => true,
        }
    }
}
