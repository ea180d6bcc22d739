#[macro_use]
extern crate log;

pub mod alphabet;
pub mod cli;
pub mod correct;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod matrix;
pub mod reads;
pub mod stats;

pub use error::{CorrectionError, Result};
