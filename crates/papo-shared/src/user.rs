//! User documents as stored by the daemon.

use crate::achievements::Achievement;
use crate::error::PapoError;
use crate::progression::ProgressSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

/// Roles a user can have in the association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Resident,
    Moderator,
    Association,
}

/// Fields a client supplies when registering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// Partial update of a registered user; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.display_name.is_none() && self.email.is_none() && self.role.is_none()
    }

    /// Validate and copy the present fields onto `user`
    pub fn apply_to(&self, user: &mut UserRecord) -> Result<(), PapoError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_display_name(self.display_name.as_deref())?;

        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(display_name) = &self.display_name {
            user.display_name = Some(display_name.clone());
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        Ok(())
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    pub level: ProgressSnapshot,
    pub achievements: Vec<Achievement>,
    pub voice_interactions_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Fresh user at the starting snapshot with no achievements
    pub fn new(new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new_user.name,
            display_name: new_user.display_name,
            email: new_user.email,
            role: new_user.role,
            level: ProgressSnapshot::default(),
            achievements: Vec::new(),
            voice_interactions_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn achievement_ids(&self) -> HashSet<String> {
        self.achievements.iter().map(|a| a.id.clone()).collect()
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}

/// Check a user name against the length limits (in characters)
pub fn validate_name(name: &str) -> Result<(), PapoError> {
    let len = name.trim().chars().count();
    if len < NAME_MIN_CHARS {
        return Err(PapoError::InvalidName(format!(
            "name must have at least {} characters",
            NAME_MIN_CHARS
        )));
    }
    if len > NAME_MAX_CHARS {
        return Err(PapoError::InvalidName(format!(
            "name must have at most {} characters",
            NAME_MAX_CHARS
        )));
    }
    Ok(())
}

/// A display name is optional but, when present, has the same minimum length
pub fn validate_display_name(display_name: Option<&str>) -> Result<(), PapoError> {
    match display_name {
        Some(d) if d.trim().chars().count() < NAME_MIN_CHARS => Err(PapoError::InvalidName(
            format!("display_name must have at least {} characters", NAME_MIN_CHARS),
        )),
        _ => Ok(()),
    }
}

impl NewUser {
    pub fn validate(&self) -> Result<(), PapoError> {
        validate_name(&self.name)?;
        validate_display_name(self.display_name.as_deref())
    }
}
