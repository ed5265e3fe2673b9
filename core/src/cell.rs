use serde::{Deserialize, Serialize};

/// Player-visible lifecycle of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum CellState {
    Hidden,
    Opened,
    Flagged,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One cell of the minefield arena.
///
/// `nearby_mines` and `nearby_flags` are incremental counters over the
/// in-bounds 8-neighborhood; the board adjusts them whenever a neighbor's
/// mine or flag changes, so reading them is O(1).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Cell {
    pub(crate) has_mine: bool,
    pub(crate) state: CellState,
    pub(crate) nearby_mines: u8,
    pub(crate) nearby_flags: u8,
}

impl Cell {
    pub(crate) const fn is_hidden(self) -> bool {
        matches!(self.state, CellState::Hidden)
    }
}

/// What a renderer is allowed to see of a cell. While the game is running
/// mines stay invisible; once it ends the projection discloses them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Opened(u8),
    Flagged,
    /// The mine the player stepped on.
    TriggeredMine,
    /// Any other mine disclosed by the end-of-game reveal.
    Mine,
    /// A flag that turned out to sit on a mine-free cell.
    Misflagged,
}
