//! Constant (non-committed) columns: the program ROM and the global
//! first/last-row indicators.

mod constants;
mod rom;

pub use constants::GlobalConstants;
pub use rom::{Rom, RomColumn, RomError};
