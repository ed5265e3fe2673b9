use crate::OpenOutcome;
use crate::board::{Board, GameState};
use crate::cell::CellState;
use crate::types::{self, Coord2, GridIndex};

impl Board {
    /// Open a cell, or with `chord` the whole 3x3 block around it.
    ///
    /// The chord precondition is the caller's to check (`can_chord_at`); this
    /// routine opens whatever hidden seeds it is handed and lets the flood
    /// fill cascade through zero-count regions. Chording before the first
    /// open degrades to a plain single-cell open.
    pub fn open_block(&mut self, coords: Coord2, chord: bool) -> OpenOutcome {
        if self.state.is_finished() {
            return OpenOutcome::NoChange;
        }

        let bounds = self.size();
        let mut stack: Vec<Coord2> = Vec::new();
        if chord && self.started {
            for pos in types::block(coords, bounds) {
                if self.cell(pos).is_hidden() {
                    stack.push(pos);
                }
            }
        } else if types::in_bounds(coords, bounds) && self.cell(coords).is_hidden() {
            self.relocate_first_click_mine(coords);
            stack.push(coords);
        }

        let mut opened_any = false;
        while let Some(pos) = stack.pop() {
            let cell = self.cell(pos);
            if !cell.is_hidden() {
                // reached again through the cascade
                continue;
            }
            self.cells[pos.nd()].state = CellState::Opened;

            if cell.has_mine {
                self.kill(pos);
                return OpenOutcome::Exploded;
            }

            opened_any = true;
            self.remaining_hidden -= 1;
            log::trace!("opened {pos:?}, {} still hidden", self.remaining_hidden);

            if cell.nearby_mines == 0 {
                for neighbor in types::neighbors(pos, bounds) {
                    if self.cell(neighbor).is_hidden() {
                        stack.push(neighbor);
                    }
                }
            }
        }

        // correct flood accounting lands exactly on the mine count; <= is a backstop
        if self.remaining_hidden <= self.mine_count {
            self.win();
            return OpenOutcome::Won;
        }

        if opened_any {
            OpenOutcome::Opened
        } else {
            OpenOutcome::NoChange
        }
    }

    fn kill(&mut self, at: Coord2) {
        self.triggered_mine = Some(at);
        self.state = GameState::Dead;
        log::debug!("mine hit at {at:?}");
        self.reveal_answer();
    }

    fn win(&mut self) {
        self.state = GameState::Won;
        log::debug!("board cleared");
        self.reveal_answer();
        self.flag_count = self.mine_count;
    }
}
