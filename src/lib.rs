pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod processing;
pub mod signal_processing;
pub mod simulation;
pub mod wav;

pub use config::SimConfig;
pub use error::{FilterError, Result};
pub use wav::save_wav;
