use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("mine coordinates outside the grid")]
    MineOutOfBounds,
    #[error("more mines than the grid can hold")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;
