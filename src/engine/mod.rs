//! Time-based task scheduling for the control side of the game.

pub mod scheduler;

pub use scheduler::{CancelToken, Scheduler, TaskHandle};
