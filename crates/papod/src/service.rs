//! User operations behind the HTTP routes.
//!
//! Each operation reads the current document, runs the pure engines from
//! `papo_shared` on it and writes the result back with a version check,
//! retrying from a fresh read when another writer got there first.

use crate::config::Config;
use crate::store::{StoreError, UserStore};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use papo_shared::achievements::{self, format_achievement_unlock, grant_into, level_id, Achievement};
use papo_shared::{
    apply_xp, extract, resolve, CommandResponse, NewUser, PapoError, UserRecord, UserRole, UserUpdate,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Core(#[from] PapoError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("User {id} is being updated concurrently, gave up after {attempts} attempts")]
    Conflict { id: String, attempts: u32 },
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Core(PapoError::InvalidAmount(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Core(PapoError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Core(PapoError::InvalidSnapshot(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Store(StoreError::DuplicateEmail(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Store(StoreError::VersionConflict { .. }) => StatusCode::CONFLICT,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }
}

/// Apply `amount` XP to `user` and mint a `level_<N>` badge per level crossed.
/// Returns the badges that were actually new.
pub fn award_xp(user: &mut UserRecord, amount: i64, now: DateTime<Utc>) -> Result<Vec<Achievement>, PapoError> {
    let outcome = apply_xp(user.level, amount)?;
    user.level = outcome.snapshot;

    let mut ids = user.achievement_ids();
    let mut granted = Vec::new();
    for event in outcome.level_ups {
        let level = event.new_level;
        if let Some(ach) = grant_into(&mut user.achievements, &mut ids, &level_id(level), || {
            achievements::level_reached(level, now)
        }) {
            granted.push(ach);
        }
    }
    Ok(granted)
}

pub struct UserService {
    store: UserStore,
    voice_command_xp: i64,
    max_update_attempts: u32,
}

impl UserService {
    pub fn new(store: UserStore, config: &Config) -> Self {
        Self {
            store,
            voice_command_xp: config.gamification.voice_command_xp,
            max_update_attempts: config.store.max_update_attempts.max(1),
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Register a user and grant the welcome badge
    pub async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, ServiceError> {
        new_user.validate()?;

        let now = Utc::now();
        let mut user = UserRecord::new(new_user, now);
        let mut ids = user.achievement_ids();
        grant_into(&mut user.achievements, &mut ids, achievements::WELCOME, || {
            achievements::welcome(now)
        });

        let doc = self.store.insert(user).await?;
        info!("[U]  Created user {} ({})", doc.user.id, doc.user.name);
        Ok(doc.user)
    }

    /// Register a user from a spoken introduction
    pub async fn onboard_from_voice(&self, transcript: &str) -> Result<UserRecord, ServiceError> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(ServiceError::InvalidInput(
                "A transcrição não pode estar vazia".to_string(),
            ));
        }

        let name = extract(transcript);
        let now = Utc::now();
        let mut user = UserRecord::new(
            NewUser {
                name: name.clone(),
                display_name: Some(name),
                ..Default::default()
            },
            now,
        );
        user.voice_interactions_count = 1;
        let mut ids = user.achievement_ids();
        grant_into(&mut user.achievements, &mut ids, achievements::VOICE_ONBOARDING, || {
            achievements::voice_onboarding(now)
        });

        let doc = self.store.insert(user).await?;
        info!("[V]  Onboarded {} from voice as {}", doc.user.id, doc.user.name);
        Ok(doc.user)
    }

    pub async fn get_user(&self, id: &str) -> Result<UserRecord, ServiceError> {
        self.store
            .get(id)
            .await
            .map(|doc| doc.user)
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }

    pub async fn list_users(&self, role: Option<UserRole>) -> Vec<UserRecord> {
        self.store.list(role).await
    }

    /// Change profile fields; progress and achievements are never touched here
    pub async fn update_profile(&self, id: &str, update: UserUpdate) -> Result<UserRecord, ServiceError> {
        if update.is_empty() {
            return self.get_user(id).await;
        }
        let (user, _) = self
            .update_user(id, |user| Ok(update.apply_to(user)?))
            .await?;
        info!("[U]  Updated user {}", user.id);
        Ok(user)
    }

    /// Add XP to a user, granting level badges on the way
    pub async fn add_xp(&self, id: &str, amount: i64) -> Result<UserRecord, ServiceError> {
        if amount <= 0 {
            return Err(PapoError::InvalidAmount(amount).into());
        }

        let (user, granted) = self
            .update_user(id, |user| Ok(award_xp(user, amount, Utc::now())?))
            .await?;

        info!(
            "[X]  +{}XP for {}  Level {} ({}/{})",
            amount, user.id, user.level.level, user.level.xp, user.level.next_level_xp
        );
        for ach in &granted {
            info!("[X]  {}", format_achievement_unlock(ach));
        }
        Ok(user)
    }

    /// Classify a voice command; known users also get credit for using voice
    pub async fn handle_voice_command(&self, text: &str, user_id: Option<&str>) -> CommandResponse {
        let intent = resolve(text);
        debug!("[V]  {:?} <- {:?}", intent, text);

        if let Some(id) = user_id {
            let xp = self.voice_command_xp;
            let result = self
                .update_user(id, |user| {
                    user.voice_interactions_count += 1;
                    if xp > 0 {
                        award_xp(user, xp, Utc::now())?;
                    }
                    Ok(())
                })
                .await;
            if let Err(e) = result {
                warn!("[V]  Could not credit voice command to {}: {}", id, e);
            }
        }

        intent.response()
    }

    /// Read-apply-write with a version check, retried on conflicts
    async fn update_user<T, F>(&self, id: &str, mut apply: F) -> Result<(UserRecord, T), ServiceError>
    where
        F: FnMut(&mut UserRecord) -> Result<T, ServiceError>,
    {
        for attempt in 1..=self.max_update_attempts {
            let doc = self
                .store
                .get(id)
                .await
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

            let mut user = doc.user;
            let out = apply(&mut user)?;
            user.updated_at = Utc::now();

            match self.store.replace_if_version(doc.version, user.clone()).await {
                Ok(_) => return Ok((user, out)),
                Err(StoreError::VersionConflict { found, .. }) => {
                    debug!(
                        "[U]  Version conflict on {} (attempt {}, now at {})",
                        id, attempt, found
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Conflict {
            id: id.to_string(),
            attempts: self.max_update_attempts,
        })
    }
}
