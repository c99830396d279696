//! Progression engine: XP deltas in, level-ups out.
//!
//! A user's progress is a `(level, xp, next_level_xp)` triple. XP earned is
//! added to `xp`; every time `xp` reaches the threshold the threshold amount is
//! consumed, the level goes up by one and the next threshold grows by 10%
//! (truncated to an integer).
//!
//! ```text
//! {level: 1, xp: 0, next_level_xp: 100}  + 250 XP
//!   -> level 2, xp 150, threshold 110
//!   -> level 3, xp  40, threshold 121
//! ```
//!
//! The engine is a pure function over snapshots. Persisting the result (and
//! doing so atomically with respect to other writers) is the caller's job.

use crate::error::PapoError;
use serde::{Deserialize, Serialize};

/// Level a brand new user starts at
pub const STARTING_LEVEL: u32 = 1;

/// XP needed to leave the starting level
pub const STARTING_NEXT_LEVEL_XP: u64 = 100;

/// Threshold multiplier applied on every level-up (result is truncated)
pub const LEVEL_GROWTH_FACTOR: f64 = 1.1;

/// A user's progress as stored on the user document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Current level (>= 1)
    pub level: u32,
    /// XP accumulated inside the current level
    pub xp: u64,
    /// XP required to reach the next level (> 0)
    pub next_level_xp: u64,
}

impl ProgressSnapshot {
    pub fn new(level: u32, xp: u64, next_level_xp: u64) -> Self {
        Self { level, xp, next_level_xp }
    }

    /// Check the structural invariants a stored snapshot must satisfy
    pub fn validate(&self) -> Result<(), PapoError> {
        if self.level < STARTING_LEVEL {
            return Err(PapoError::InvalidSnapshot(format!(
                "level must be at least {} (got {})",
                STARTING_LEVEL, self.level
            )));
        }
        if self.next_level_xp == 0 {
            return Err(PapoError::InvalidSnapshot(
                "next_level_xp must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Progress inside the current level, 0-100
    pub fn progress_percent(&self) -> u8 {
        if self.next_level_xp == 0 {
            return 0;
        }
        ((self.xp.min(self.next_level_xp) as f64 / self.next_level_xp as f64) * 100.0) as u8
    }
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self::new(STARTING_LEVEL, 0, STARTING_NEXT_LEVEL_XP)
    }
}

/// One level crossed during a single XP application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpEvent {
    pub new_level: u32,
}

/// Result of applying an XP delta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpOutcome {
    pub snapshot: ProgressSnapshot,
    /// In ascending level order, one per level crossed
    pub level_ups: Vec<LevelUpEvent>,
}

impl XpOutcome {
    pub fn leveled_up(&self) -> bool {
        !self.level_ups.is_empty()
    }
}

/// Threshold for the level after one with `threshold`
pub fn next_threshold(threshold: u64) -> u64 {
    // Float truncation, not rounding: the curve is visible to users.
    let grown = (threshold as f64 * LEVEL_GROWTH_FACTOR) as u64;
    grown.max(threshold)
}

/// Apply `delta` XP to `current`.
///
/// Fails with [`PapoError::InvalidAmount`] for `delta <= 0` and with
/// [`PapoError::InvalidSnapshot`] if `current` breaks the snapshot invariants
/// or the level would overflow.
/// Same inputs always give the same outcome.
pub fn apply_xp(current: ProgressSnapshot, delta: i64) -> Result<XpOutcome, PapoError> {
    if delta <= 0 {
        return Err(PapoError::InvalidAmount(delta));
    }
    current.validate()?;

    let mut snapshot = current;
    snapshot.xp = snapshot.xp.saturating_add(delta as u64);

    let mut level_ups = Vec::new();
    while snapshot.xp >= snapshot.next_level_xp {
        snapshot.level = snapshot.level.checked_add(1).ok_or_else(|| {
            PapoError::InvalidSnapshot(format!("level cannot go past {}", u32::MAX))
        })?;
        snapshot.xp -= snapshot.next_level_xp;
        snapshot.next_level_xp = next_threshold(snapshot.next_level_xp);
        level_ups.push(LevelUpEvent { new_level: snapshot.level });
    }

    Ok(XpOutcome { snapshot, level_ups })
}
