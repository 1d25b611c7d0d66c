//! Console formatting, prompting and logging

pub mod console;
pub mod display;
pub mod logging;

pub use console::ConsoleIo;
pub use display::{Color, ColorOutput, FamilyFormatter};
pub use logging::ConsoleLogger;
