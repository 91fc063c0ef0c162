//! Rec Yard remote service client.
//!
//! The Rec Yard is the hosted competitive tier: a row-level REST API over
//! the `profiles`, `rec_yard_runs`, and `workout_submissions` tables.
//! The core only performs keyed CRUD at session boundaries (start,
//! completion, abandonment), one attempt per operation, no retries.
//!
//! URL and payload construction are kept as pure functions so they can be
//! tested without a network.

use crate::config::RecYardConfig;
use crate::types::WorkoutRecord;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Status column of a `rec_yard_runs` row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Active,
    Complete,
    Dnf,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Active => "active",
            RunStatus::Complete => "complete",
            RunStatus::Dnf => "dnf",
        }
    }
}

/// A row of the remote `profiles` table
#[derive(Clone, Debug, Deserialize)]
pub struct RemoteProfile {
    pub id: Uuid,
    #[serde(default)]
    pub display_name: Option<String>,
    /// The entitlement flag: whether the competitive tier is unlocked
    #[serde(default)]
    pub rec_yard_access: bool,
    #[serde(default)]
    pub total_workouts: u32,
    #[serde(default)]
    pub total_pushups: u64,
    #[serde(default)]
    pub total_squats: u64,
}

/// REST endpoint for a table
pub fn table_url(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

/// Insert payload for a fresh `rec_yard_runs` row
pub fn run_payload(
    run_id: Uuid,
    user_id: Uuid,
    rule_set_id: &str,
    now: DateTime<Utc>,
) -> serde_json::Value {
    json!({
        "id": run_id,
        "user_id": user_id,
        "rule_set_id": rule_set_id,
        "status": RunStatus::Active.as_str(),
        "started_at": now.to_rfc3339(),
    })
}

/// Insert payload for a `workout_submissions` leaderboard row
pub fn submission_payload(user_id: Uuid, record: &WorkoutRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "user_id": user_id,
        "rule_set_id": record.rule_set_id,
        "duration_seconds": record.duration_seconds,
        "total_pushups": record.total_pushups,
        "total_squats": record.total_squats,
        "cards_completed": record.cards_completed,
        "performed_at": record.performed_at.to_rfc3339(),
    })
}

/// Update payload folding a completed workout into profile aggregates
pub fn bumped_stats_payload(profile: &RemoteProfile, record: &WorkoutRecord) -> serde_json::Value {
    json!({
        "total_workouts": profile.total_workouts + 1,
        "total_pushups": profile.total_pushups + u64::from(record.total_pushups),
        "total_squats": profile.total_squats + u64::from(record.total_squats),
    })
}

/// Thin HTTP client for the Rec Yard tables
pub struct RecYardClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RecYardClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from config; official runs require both fields.
    pub fn from_config(config: &RecYardConfig) -> Result<Self> {
        match (&config.base_url, &config.api_key) {
            (Some(base_url), Some(api_key)) => Ok(Self::new(base_url, api_key)),
            _ => Err(Error::Config(
                "Rec Yard base_url and api_key must be configured for official runs".into(),
            )),
        }
    }

    /// Fetch the profile row for a user
    pub async fn fetch_profile(&self, user_id: Uuid) -> Result<RemoteProfile> {
        let url = format!(
            "{}?id=eq.{}",
            table_url(&self.base_url, "profiles"),
            user_id
        );

        let rows: Vec<RemoteProfile> = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| Error::Remote(format!("No profile row for user {}", user_id)))
    }

    /// Entitlement check consulted before an official run starts
    pub async fn has_rec_yard_access(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.fetch_profile(user_id).await?.rec_yard_access)
    }

    /// Register a fresh official run; returns the client-generated row id
    pub async fn create_run(
        &self,
        user_id: Uuid,
        rule_set_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        let run_id = Uuid::new_v4();
        self.insert("rec_yard_runs", &run_payload(run_id, user_id, rule_set_id, now))
            .await?;
        tracing::debug!("Registered Rec Yard run {}", run_id);
        Ok(run_id)
    }

    /// Update the status column of a run row
    pub async fn update_run_status(&self, run_id: Uuid, status: RunStatus) -> Result<()> {
        let url = format!(
            "{}?id=eq.{}",
            table_url(&self.base_url, "rec_yard_runs"),
            run_id
        );

        self.http
            .patch(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&json!({ "status": status.as_str() }))
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Marked run {} as {}", run_id, status.as_str());
        Ok(())
    }

    /// Insert a leaderboard submission row
    pub async fn submit_workout(&self, user_id: Uuid, record: &WorkoutRecord) -> Result<()> {
        self.insert("workout_submissions", &submission_payload(user_id, record))
            .await
    }

    /// Fold a completed workout into the remote profile aggregates
    ///
    /// Read-then-write; concurrent devices can race and the last write
    /// wins, matching the leaderboard's best-effort contract.
    pub async fn update_profile_stats(&self, user_id: Uuid, record: &WorkoutRecord) -> Result<()> {
        let profile = self.fetch_profile(user_id).await?;
        let url = format!(
            "{}?id=eq.{}",
            table_url(&self.base_url, "profiles"),
            user_id
        );

        self.http
            .patch(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&bumped_stats_payload(&profile, record))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn insert(&self, table: &str, payload: &serde_json::Value) -> Result<()> {
        self.http
            .post(table_url(&self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
