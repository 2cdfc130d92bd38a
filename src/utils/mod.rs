//! Utility Module

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResult};
pub use time::{now_millis, today_stamp};
