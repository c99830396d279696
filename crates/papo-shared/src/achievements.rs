//! Achievement badges for the Papo Social gamification layer.
//!
//! Achievements are granted at most once per user, keyed by id. The registry
//! only decides whether a grant happens; appending and persisting the badge is
//! up to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Granted when an account is created
pub const WELCOME: &str = "welcome";

/// Granted when an account is created from a spoken introduction
pub const VOICE_ONBOARDING: &str = "voice_onboarding";

/// Prefix of the per-level achievements (`level_2`, `level_3`, ...)
pub const LEVEL_PREFIX: &str = "level_";

/// A badge unlocked by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable key, unique within a user's achievements
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

impl Achievement {
    pub fn new(id: &str, name: &str, description: &str, icon: &str, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            unlocked_at,
        }
    }

    /// Level number for `level_<N>` achievements
    pub fn level(&self) -> Option<u32> {
        self.id.strip_prefix(LEVEL_PREFIX)?.parse().ok()
    }
}

/// Id of the achievement minted when `level` is reached
pub fn level_id(level: u32) -> String {
    format!("{}{}", LEVEL_PREFIX, level)
}

pub fn welcome(unlocked_at: DateTime<Utc>) -> Achievement {
    Achievement::new(
        WELCOME,
        "Bem-vindo ao Papo Social!",
        "Você criou sua conta e começou sua jornada.",
        "🎉",
        unlocked_at,
    )
}

pub fn voice_onboarding(unlocked_at: DateTime<Utc>) -> Achievement {
    Achievement::new(
        VOICE_ONBOARDING,
        "Voz Ativa!",
        "Você se apresentou usando sua voz. Bem-vindo ao Papo Social!",
        "🎤",
        unlocked_at,
    )
}

pub fn level_reached(level: u32, unlocked_at: DateTime<Utc>) -> Achievement {
    Achievement {
        id: level_id(level),
        name: format!("Nível {}!", level),
        description: format!("Você alcançou o nível {}.", level),
        icon: "⭐".to_string(),
        unlocked_at,
    }
}

/// Grant `achievement_id` unless it is already in `existing_ids`.
///
/// `builder` only runs when the grant happens. Content is never compared:
/// an id that is present blocks the grant even if the new badge would differ.
pub fn grant<F>(existing_ids: &HashSet<String>, achievement_id: &str, builder: F) -> Option<Achievement>
where
    F: FnOnce() -> Achievement,
{
    if existing_ids.contains(achievement_id) {
        return None;
    }
    Some(builder())
}

/// Grant into a user's list, keeping `ids` in sync. Returns the new badge.
pub fn grant_into<F>(
    achievements: &mut Vec<Achievement>,
    ids: &mut HashSet<String>,
    achievement_id: &str,
    builder: F,
) -> Option<Achievement>
where
    F: FnOnce() -> Achievement,
{
    let granted = grant(ids, achievement_id, builder)?;
    ids.insert(granted.id.clone());
    achievements.push(granted.clone());
    Some(granted)
}

/// Format a single achievement for notification
pub fn format_achievement_unlock(ach: &Achievement) -> String {
    format!("{} Conquista desbloqueada: {} - {}", ach.icon, ach.name, ach.description)
}
