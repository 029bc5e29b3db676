//! Command line parsing and the `Settings` it turns into

pub mod cli;
pub mod settings;

pub use cli::Cli;
pub use settings::Settings;
