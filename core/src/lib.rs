//! Core roster domain: parsing spreadsheet-derived exports, merging
//! monthly fragments into one canonical roster, diffing schedules and the
//! small edit/overview helpers the tools are built from.
//!
//! Everything in this crate is synchronous and I/O-free; persistence and
//! transport live in the sibling crates.

use std::path::PathBuf;

pub mod dates;
pub mod diff;
pub mod edit;
pub mod merge;
pub mod model;
pub mod overview;
pub mod parser;
pub mod shift_code;

pub use model::{Employee, Roster, Team};
pub use parser::RosterFragment;

/// Root directory for persisted local state.
///
/// `$ROSTER_HOME` wins when set and non-empty; otherwise `~/.roster`.
pub fn roster_home() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("ROSTER_HOME")
        && !dir.trim().is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".roster"))
}
