//! Shared types and engines for Papo Social components.
//!
//! Everything here is pure: the engines take their inputs as arguments and
//! return new values. Storage and transport live in `papod`.

pub mod achievements;
pub mod error;
pub mod intent;
pub mod name_extractor;
pub mod progression;
pub mod user;

pub use achievements::Achievement;
pub use error::PapoError;
pub use intent::{resolve, Action, CommandResponse, Intent};
pub use name_extractor::extract;
pub use progression::{apply_xp, LevelUpEvent, ProgressSnapshot, XpOutcome};
pub use user::{NewUser, UserRecord, UserRole, UserUpdate};
