//! The quote controller and its options

pub mod config;
pub mod session;

pub use config::ControllerOptions;
pub use session::{QuoteController, ScriptStep};
