pub mod commands;
pub mod state;
pub mod view;

pub use commands::{Command, Outcome};
pub use state::AppState;
