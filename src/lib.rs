// Pwman - Library root
//
// Re-exports the store and CLI modules.

pub mod cli;
pub mod error;
pub mod store;

pub use error::{PwmanError, Result};
