//! Terminal feedback while long-running steps execute.
//!
//! This module provides the scrolling train animation, its ASCII art, and
//! the terminal abstraction it draws through.

pub mod art;
pub mod terminal;
mod train;

pub use art::{FrameSet, Scene, SMOKE_FRAMES, TRAIN_FRAMES};
pub use terminal::{
    terminal_width, CrosstermTerminal, RecordingTerminal, Terminal, TerminalOp, DEFAULT_WIDTH,
};
pub use train::{compose_frame, Phase, TrainAnimation, SCROLL_STEP, TICK_INTERVAL, WRAP_MARGIN};
