use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::board::{Board, GameState};
use crate::sampler::MineSampler;
use crate::types::{CellCount, Coord2};
use crate::GameConfig;

bitflags! {
    /// Abstract pointer buttons reported by the host with each gesture.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PointerButtons: u8 {
        const PRIMARY = 1;
        const SECONDARY = 1 << 1;
    }
}

/// Cells the host should draw depressed while a press is in flight. Purely
/// visual; nothing on the board has changed yet, and only still-hidden cells
/// in the target actually render depressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PressTarget {
    pub center: Coord2,
    /// Depress the whole 3x3 block instead of the single cell.
    pub wide: bool,
}

/// Discrete notifications pushed to the host, replacing any polling of the
/// board between gestures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// First cell opened; timers should start running.
    Started,
    StateChanged(GameState),
    FlagCountChanged(CellCount),
    /// The pressed-cell preview appeared, moved, or cleared.
    PreviewChanged(Option<PressTarget>),
}

pub trait EventSink {
    fn notify(&mut self, event: GameEvent);
}

impl<F: FnMut(GameEvent)> EventSink for F {
    fn notify(&mut self, event: GameEvent) {
        self(event)
    }
}

/// Translates press/drag/release gestures into board operations and game
/// state notifications.
///
/// The board is owned exclusively; one gesture is processed to completion
/// before the next is accepted. Once the game ends all gestures are swallowed
/// until a new game is dealt.
#[derive(Debug)]
pub struct GameController<S> {
    board: Board,
    sink: S,
    prev_buttons: PointerButtons,
    ignore_next_release: bool,
    preview: Option<PressTarget>,
}

impl<S: EventSink> GameController<S> {
    pub fn new(board: Board, sink: S) -> Self {
        Self {
            board,
            sink,
            prev_buttons: PointerButtons::empty(),
            ignore_next_release: false,
            preview: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Current press preview, for hosts that render rather than listen.
    pub fn preview(&self) -> Option<PressTarget> {
        self.preview
    }

    /// Throw the old board away and deal a fresh one.
    pub fn new_game(&mut self, config: GameConfig) {
        self.replace_board(Board::new(config));
    }

    pub fn new_game_with_sampler<M: MineSampler>(&mut self, config: GameConfig, sampler: M) {
        self.replace_board(Board::with_sampler(config, sampler));
    }

    fn replace_board(&mut self, board: Board) {
        self.board = board;
        self.prev_buttons = PointerButtons::empty();
        self.ignore_next_release = false;
        self.set_preview(None);
    }

    pub fn on_press(&mut self, pos: Coord2, buttons: PointerButtons) {
        if self.board.state().is_finished() {
            return;
        }
        log::trace!("press at {pos:?} ({buttons:?})");

        self.ignore_next_release = false;
        match buttons {
            b if b == PointerButtons::PRIMARY => {
                self.set_preview(Some(PressTarget {
                    center: pos,
                    wide: false,
                }));
            }
            b if b == PointerButtons::SECONDARY => {
                self.apply(|board| board.toggle_flag(pos));
            }
            b if b == PointerButtons::all() => {
                self.set_preview(Some(PressTarget {
                    center: pos,
                    wide: true,
                }));
            }
            _ => {}
        }
        self.prev_buttons = buttons;
    }

    pub fn on_drag(&mut self, pos: Coord2, buttons: PointerButtons) {
        if self.board.state().is_finished() {
            return;
        }

        if buttons.contains(PointerButtons::PRIMARY) {
            self.set_preview(Some(PressTarget {
                center: pos,
                wide: buttons.contains(PointerButtons::SECONDARY),
            }));
        }
    }

    pub fn on_release(&mut self, pos: Coord2, buttons: PointerButtons) {
        if self.board.state().is_finished() {
            return;
        }
        log::trace!("release at {pos:?} ({buttons:?})");

        if self.ignore_next_release {
            // second half of a two-button release
            self.ignore_next_release = false;
            self.prev_buttons = buttons;
            return;
        }

        match self.prev_buttons {
            b if b == PointerButtons::PRIMARY => {
                self.set_preview(None);
                self.apply(|board| {
                    let outcome = board.open_block(pos, false);
                    board.mark_started();
                    outcome
                });
            }
            b if b == PointerButtons::all() => {
                self.set_preview(None);
                if self.board.can_chord_at(pos) {
                    self.apply(|board| board.open_block(pos, true));
                }
                self.ignore_next_release = true;
            }
            _ => {}
        }
        self.prev_buttons = buttons;
    }

    fn set_preview(&mut self, target: Option<PressTarget>) {
        if self.preview != target {
            self.preview = target;
            self.sink.notify(GameEvent::PreviewChanged(target));
        }
    }

    /// Run a board operation and notify for whatever it changed.
    fn apply<R>(&mut self, op: impl FnOnce(&mut Board) -> R) -> R {
        let started = self.board.is_started();
        let state = self.board.state();
        let flags = self.board.flag_count();

        let result = op(&mut self.board);

        if !started && self.board.is_started() {
            self.sink.notify(GameEvent::Started);
        }
        if state != self.board.state() {
            self.sink.notify(GameEvent::StateChanged(self.board.state()));
        }
        if flags != self.board.flag_count() {
            self.sink
                .notify(GameEvent::FlagCountChanged(self.board.flag_count()));
        }
        result
    }
}
