use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellState, CellView};
use crate::error::{GameError, Result};
use crate::sampler::{BernoulliSampler, MineSampler};
use crate::types::{self, CellCount, Coord, Coord2, GridIndex};
use crate::{GameConfig, MarkOutcome};

/// Terminal state machine of one game. `Active` can move to `Won` or `Dead`;
/// both ends are final and every later mutation becomes a no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Active,
    Won,
    Dead,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Dead)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Active
    }
}

/// The minefield: a flat arena of cells plus the counters that drive the
/// win/loss decisions.
///
/// A board is dealt once and thrown away at the end of the game; starting a
/// new game always means constructing a fresh one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    pub(crate) width: Coord,
    pub(crate) height: Coord,
    pub(crate) mine_count: CellCount,
    pub(crate) flag_count: CellCount,
    pub(crate) remaining_hidden: CellCount,
    pub(crate) started: bool,
    pub(crate) state: GameState,
    pub(crate) triggered_mine: Option<Coord2>,
}

impl Board {
    /// Deal a board with an OS-seeded sampler.
    pub fn new(config: GameConfig) -> Self {
        Self::with_sampler(config, BernoulliSampler::from_entropy())
    }

    /// Deal a board with the given mine sampler. The config is clamped first,
    /// so the sampler always sees a playable geometry.
    pub fn with_sampler<S: MineSampler>(config: GameConfig, mut sampler: S) -> Self {
        let GameConfig {
            width,
            height,
            mines,
        } = config.clamped();

        let mut board = Self::blank(width, height, mines);
        for idx in sampler.sample(types::cell_total(width, height), mines) {
            board.place_mine(types::from_flat(idx, width));
        }
        board
    }

    /// Build a board from an explicit mine layout.
    ///
    /// This path trusts the caller's dimensions instead of clamping them, so
    /// embedders and tests can stage exact scenarios. At least one cell must
    /// stay mine-free and every coordinate must be on the grid.
    pub fn with_mines(width: Coord, height: Coord, mines: &[Coord2]) -> Result<Self> {
        let total = types::cell_total(width, height);
        if mines.len() as CellCount >= total {
            return Err(GameError::TooManyMines);
        }

        let mut board = Self::blank(width, height, 0);
        for &coords in mines {
            if !types::in_bounds(coords, (width, height)) {
                return Err(GameError::MineOutOfBounds);
            }
            if !board.cells[coords.nd()].has_mine {
                board.place_mine(coords);
                board.mine_count += 1;
            }
        }
        Ok(board)
    }

    fn blank(width: Coord, height: Coord, mine_count: CellCount) -> Self {
        Self {
            cells: Array2::default((usize::from(width), usize::from(height))),
            width,
            height,
            mine_count,
            flag_count: 0,
            remaining_hidden: types::cell_total(width, height),
            started: false,
            state: GameState::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Count of cells not yet opened, flagged cells included. The game is won
    /// once this drops to the mine count.
    pub fn remaining_hidden(&self) -> CellCount {
        self.remaining_hidden
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// HUD counter value: mines minus flags. Goes negative when the player
    /// over-flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_count) - i32::from(self.flag_count)
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.cells[coords.nd()].has_mine
    }

    /// The mine the player stepped on, recorded when the game is lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub(crate) fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub(crate) fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.nd()]
    }

    pub(crate) fn mark_started(&mut self) {
        self.started = true;
    }

    fn place_mine(&mut self, coords: Coord2) {
        self.cells[coords.nd()].has_mine = true;
        for pos in types::neighbors(coords, self.size()) {
            self.cells[pos.nd()].nearby_mines += 1;
        }
    }

    fn remove_mine(&mut self, coords: Coord2) {
        self.cells[coords.nd()].has_mine = false;
        for pos in types::neighbors(coords, self.size()) {
            self.cells[pos.nd()].nearby_mines -= 1;
        }
    }

    /// Move the mine under the player's first click to the first mine-free
    /// cell in scan order, keeping the total unchanged. No-op once the game
    /// has started or when the cell holds no mine.
    pub(crate) fn relocate_first_click_mine(&mut self, coords: Coord2) {
        if self.started || !self.cells[coords.nd()].has_mine {
            return;
        }

        for idx in 0..types::cell_total(self.width, self.height) {
            let target = types::from_flat(idx, self.width);
            if !self.cells[target.nd()].has_mine {
                self.place_mine(target);
                log::debug!("first-click mine moved from {coords:?} to {target:?}");
                break;
            }
        }
        self.remove_mine(coords);
    }

    /// Toggle Hidden <-> Flagged. Opened cells, coordinates off the grid and
    /// finished games are all left alone. The outcome tells the caller
    /// whether the flag counter moved and a display refresh is due.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.state.is_finished() || !types::in_bounds(coords, self.size()) {
            return MarkOutcome::NoChange;
        }

        let delta: i8 = match self.cells[coords.nd()].state {
            CellState::Opened => return MarkOutcome::NoChange,
            CellState::Hidden => {
                self.cells[coords.nd()].state = CellState::Flagged;
                1
            }
            CellState::Flagged => {
                self.cells[coords.nd()].state = CellState::Hidden;
                -1
            }
        };

        self.flag_count = self.flag_count.wrapping_add_signed(i16::from(delta));
        for pos in types::neighbors(coords, self.size()) {
            let cell = &mut self.cells[pos.nd()];
            cell.nearby_flags = cell.nearby_flags.wrapping_add_signed(delta);
        }
        log::trace!("flag toggled at {coords:?}, {} flags", self.flag_count);
        MarkOutcome::Changed
    }

    /// Classic chord precondition: an opened, numbered cell whose neighbors
    /// carry exactly as many flags as mines.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if !types::in_bounds(coords, self.size()) {
            return false;
        }
        let cell = self.cells[coords.nd()];
        cell.state == CellState::Opened
            && cell.nearby_mines != 0
            && cell.nearby_flags == cell.nearby_mines
    }

    /// End-of-game disclosure: on `Dead` every hidden mine is opened, on
    /// `Won` every hidden mine is flagged. Counters are left as they were;
    /// the board is terminal at this point.
    pub(crate) fn reveal_answer(&mut self) {
        let won = matches!(self.state, GameState::Won);
        for idx in 0..types::cell_total(self.width, self.height) {
            let coords = types::from_flat(idx, self.width);
            let cell = &mut self.cells[coords.nd()];
            if cell.has_mine && cell.state == CellState::Hidden {
                cell.state = if won {
                    CellState::Flagged
                } else {
                    CellState::Opened
                };
            }
        }
    }

    /// Render projection of one cell.
    pub fn cell_view(&self, coords: Coord2) -> CellView {
        let cell = self.cells[coords.nd()];

        if !self.state.is_finished() {
            return match cell.state {
                CellState::Hidden => CellView::Hidden,
                CellState::Opened => CellView::Opened(cell.nearby_mines),
                CellState::Flagged => CellView::Flagged,
            };
        }

        match cell.state {
            CellState::Hidden => CellView::Hidden,
            CellState::Flagged if !cell.has_mine => CellView::Misflagged,
            CellState::Flagged => CellView::Flagged,
            CellState::Opened if self.triggered_mine == Some(coords) => CellView::TriggeredMine,
            CellState::Opened if cell.has_mine => CellView::Mine,
            CellState::Opened => CellView::Opened(cell.nearby_mines),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recount_neighbor_mines(board: &Board, coords: Coord2) -> u8 {
        types::neighbors(coords, board.size())
            .filter(|&pos| board.has_mine_at(pos))
            .count() as u8
    }

    fn for_each_cell(board: &Board, mut check: impl FnMut(Coord2)) {
        for j in 0..board.height() {
            for i in 0..board.width() {
                check((i, j));
            }
        }
    }

    #[test]
    fn sampled_board_has_exact_mine_count_and_consistent_adjacency() {
        for seed in 0..16 {
            let board = Board::with_sampler(
                GameConfig::BEGINNER,
                BernoulliSampler::with_seed(seed),
            );

            let mut mines = 0;
            for_each_cell(&board, |coords| {
                if board.has_mine_at(coords) {
                    mines += 1;
                }
                assert_eq!(
                    board.cell(coords).nearby_mines,
                    recount_neighbor_mines(&board, coords),
                    "adjacency mismatch at {coords:?} (seed {seed})"
                );
            });
            assert_eq!(mines, 10);
            assert_eq!(board.remaining_hidden(), 81);
        }
    }

    #[test]
    fn out_of_range_config_is_clamped_not_rejected() {
        let board = Board::with_sampler(
            GameConfig::new(0, 255, 0),
            BernoulliSampler::with_seed(0),
        );

        assert_eq!(board.width(), 9);
        assert_eq!(board.height(), 24);
        assert_eq!(board.mine_count(), 10);
    }

    #[test]
    fn explicit_layout_rejects_bad_input() {
        assert_eq!(
            Board::with_mines(9, 9, &[(9, 0)]),
            Err(GameError::MineOutOfBounds)
        );

        let everything: Vec<Coord2> = (0..9).flat_map(|j| (0..9).map(move |i| (i, j))).collect();
        assert_eq!(
            Board::with_mines(9, 9, &everything),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn explicit_layout_ignores_duplicate_coordinates() {
        let board = Board::with_mines(9, 9, &[(3, 3), (3, 3)]).unwrap();

        assert_eq!(board.mine_count(), 1);
        assert_eq!(board.cell((3, 4)).nearby_mines, 1);
    }

    #[test]
    fn first_click_mine_moves_to_first_free_cell_in_scan_order() {
        let mut board = Board::with_mines(9, 9, &[(0, 0), (5, 5)]).unwrap();

        board.relocate_first_click_mine((0, 0));

        assert!(!board.has_mine_at((0, 0)));
        assert!(board.has_mine_at((1, 0)));
        assert_eq!(board.mine_count(), 2);
        for_each_cell(&board, |coords| {
            assert_eq!(
                board.cell(coords).nearby_mines,
                recount_neighbor_mines(&board, coords)
            );
        });
    }

    #[test]
    fn relocation_is_a_no_op_after_start_or_without_a_mine() {
        let mut board = Board::with_mines(9, 9, &[(0, 0)]).unwrap();

        board.relocate_first_click_mine((4, 4));
        assert!(board.has_mine_at((0, 0)));

        board.mark_started();
        board.relocate_first_click_mine((0, 0));
        assert!(board.has_mine_at((0, 0)));
    }

    #[test]
    fn flag_toggles_adjust_counts_and_neighbor_counters() {
        let mut board = Board::with_mines(9, 9, &[(8, 8)]).unwrap();

        assert_eq!(board.toggle_flag((1, 1)), MarkOutcome::Changed);
        assert_eq!(board.toggle_flag((2, 1)), MarkOutcome::Changed);
        assert_eq!(board.flag_count(), 2);
        assert_eq!(board.cell((1, 1)).nearby_flags, 1);
        assert_eq!(board.cell((2, 2)).nearby_flags, 2);
        assert_eq!(board.mines_left(), -1);

        assert_eq!(board.toggle_flag((2, 1)), MarkOutcome::Changed);
        assert_eq!(board.flag_count(), 1);
        assert_eq!(board.cell((2, 2)).nearby_flags, 1);
    }

    #[test]
    fn flagging_n_distinct_cells_counts_n() {
        let mut board = Board::with_mines(9, 9, &[(8, 8)]).unwrap();

        for i in 0..5 {
            board.toggle_flag((i, 0));
        }
        assert_eq!(board.flag_count(), 5);
    }

    #[test]
    fn flagging_an_opened_cell_reports_no_change() {
        // wall of mines down column 4 keeps the cascade from clearing the board
        let wall: Vec<Coord2> = (0..9).map(|j| (4, j)).collect();
        let mut board = Board::with_mines(9, 9, &wall).unwrap();
        board.open_block((0, 0), false);

        assert_eq!(board.state(), GameState::Active);
        assert_eq!(board.toggle_flag((0, 0)), MarkOutcome::NoChange);
        assert_eq!(board.flag_count(), 0);
    }

    #[test]
    fn flagging_off_grid_reports_no_change() {
        let mut board = Board::with_mines(9, 9, &[(8, 8)]).unwrap();

        assert_eq!(board.toggle_flag((9, 0)), MarkOutcome::NoChange);
        assert_eq!(board.flag_count(), 0);
    }

    #[test]
    fn board_round_trips_through_serde() {
        let mut board = Board::with_mines(9, 9, &[(0, 0), (5, 5)]).unwrap();
        board.toggle_flag((5, 5));
        board.open_block((8, 0), false);

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
    }
}
