// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Local clock-based trial window
//!
//! The gate keeps three keys in a [`KeyValueStore`]: the start and expiration
//! timestamps (ISO-8601 UTC with milliseconds) and a `"true"` marker set once
//! a trial has been started. Nothing is validated remotely.

use ahash::AHashMap;
use anyhow::Context;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TRIAL_DAYS: i64 = 5;

pub const START_KEY: &str = "trialStartDate";
pub const EXPIRATION_KEY: &str = "trialExpirationDate";
pub const STARTED_KEY: &str = "trialStarted";

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> std::io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()>;
    fn remove(&mut self, key: &str) -> std::io::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> std::io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: std::collections::BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read trial store: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse trial store: {:?}", path))?
        } else {
            Default::default()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> std::io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TrialError {
    #[error("the trial period has already been used and has expired")]
    Expired,
    #[error("invalid timestamp in '{key}': {value}")]
    InvalidTimestamp { key: String, value: String },
    #[error("trial store error: {0}")]
    Store(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStatus {
    pub active: bool,
    pub expiration: Option<DateTime<Utc>>,
    pub days_left: i64,
    pub started: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialStart {
    Started(TrialStatus),
    AlreadyActive(TrialStatus),
}

impl TrialStart {
    pub fn status(&self) -> &TrialStatus {
        match self {
            TrialStart::Started(status) | TrialStart::AlreadyActive(status) => status,
        }
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted { days_left: i64 },
    Expired,
    NotStarted,
}

pub struct TrialGate<S: KeyValueStore> {
    store: S,
    days: i64,
}

impl<S: KeyValueStore> TrialGate<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            days: TRIAL_DAYS,
        }
    }

    pub fn with_days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn status(&self, now: DateTime<Utc>) -> Result<TrialStatus, TrialError> {
        let started = self.store.get(STARTED_KEY)?.as_deref() == Some("true");

        let Some(raw) = self.store.get(EXPIRATION_KEY)? else {
            return Ok(TrialStatus {
                active: false,
                expiration: None,
                days_left: self.days,
                started,
            });
        };
        let expiration = parse_timestamp(EXPIRATION_KEY, &raw)?;

        if now >= expiration {
            return Ok(TrialStatus {
                active: false,
                expiration: Some(expiration),
                days_left: 0,
                started,
            });
        }

        let ms_left = (expiration - now).num_milliseconds();
        Ok(TrialStatus {
            active: true,
            expiration: Some(expiration),
            days_left: (ms_left + DAY_MS - 1) / DAY_MS,
            started,
        })
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<TrialStart, TrialError> {
        let status = self.status(now)?;

        if status.started && !status.active {
            tracing::warn!("Trial start refused: the trial has expired");
            return Err(TrialError::Expired);
        }
        if status.active {
            return Ok(TrialStart::AlreadyActive(status));
        }

        let expiration = now + Duration::days(self.days);
        self.store.set(START_KEY, &format_timestamp(now))?;
        self.store.set(EXPIRATION_KEY, &format_timestamp(expiration))?;
        self.store.set(STARTED_KEY, "true")?;
        tracing::info!("Trial started, expires {}", format_timestamp(expiration));

        Ok(TrialStart::Started(self.status(now)?))
    }

    pub fn reset(&mut self) -> Result<(), TrialError> {
        for key in [START_KEY, EXPIRATION_KEY, STARTED_KEY] {
            self.store.remove(key)?;
        }
        tracing::info!("Trial state cleared");
        Ok(())
    }

    pub fn check_access(&self, now: DateTime<Utc>) -> Result<Access, TrialError> {
        let status = self.status(now)?;
        Ok(if status.active {
            Access::Granted {
                days_left: status.days_left,
            }
        } else if status.started {
            Access::Expired
        } else {
            Access::NotStarted
        })
    }
}

pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(key: &str, value: &str) -> Result<DateTime<Utc>, TrialError> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|_| TrialError::InvalidTimestamp {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_status() {
        let gate = TrialGate::new(MemoryStore::new());
        let status = gate.status(t0()).unwrap();
        assert!(!status.active);
        assert!(!status.started);
        assert_eq!(status.days_left, 5);
        assert_eq!(gate.check_access(t0()).unwrap(), Access::NotStarted);
    }

    #[test]
    fn test_start_writes_iso_timestamps() {
        let mut gate = TrialGate::new(MemoryStore::new());
        let started = gate.start(t0()).unwrap();
        assert!(matches!(started, TrialStart::Started(_)));
        assert_eq!(started.status().days_left, 5);

        let store = gate.store();
        assert_eq!(store.get(START_KEY).unwrap().unwrap(), "2025-03-10T12:00:00.000Z");
        assert_eq!(store.get(EXPIRATION_KEY).unwrap().unwrap(), "2025-03-15T12:00:00.000Z");
        assert_eq!(store.get(STARTED_KEY).unwrap().unwrap(), "true");
    }

    #[test]
    fn test_days_left_rounds_up() {
        let mut gate = TrialGate::new(MemoryStore::new());
        gate.start(t0()).unwrap();

        let later = t0() + Duration::days(3) + Duration::hours(1);
        let status = gate.status(later).unwrap();
        assert!(status.active);
        assert_eq!(status.days_left, 2);

        let last_minute = t0() + Duration::days(5) - Duration::minutes(1);
        assert_eq!(gate.status(last_minute).unwrap().days_left, 1);
    }

    #[test]
    fn test_second_start_is_a_no_op_while_active() {
        let mut gate = TrialGate::new(MemoryStore::new());
        gate.start(t0()).unwrap();
        let again = gate.start(t0() + Duration::days(1)).unwrap();
        assert!(matches!(again, TrialStart::AlreadyActive(_)));
        assert_eq!(
            gate.store().get(START_KEY).unwrap().unwrap(),
            "2025-03-10T12:00:00.000Z"
        );
    }

    #[test]
    fn test_expired_trial_cannot_restart_until_reset() {
        let mut gate = TrialGate::new(MemoryStore::new());
        gate.start(t0()).unwrap();

        let expired = t0() + Duration::days(5);
        let status = gate.status(expired).unwrap();
        assert!(!status.active);
        assert_eq!(status.days_left, 0);
        assert_eq!(gate.check_access(expired).unwrap(), Access::Expired);
        assert!(matches!(gate.start(expired), Err(TrialError::Expired)));

        gate.reset().unwrap();
        assert!(gate.store().get(STARTED_KEY).unwrap().is_none());
        assert!(matches!(gate.start(expired).unwrap(), TrialStart::Started(_)));
    }

    #[test]
    fn test_invalid_timestamp() {
        let mut store = MemoryStore::new();
        store.set(EXPIRATION_KEY, "next tuesday").unwrap();
        let gate = TrialGate::new(store);
        assert!(matches!(
            gate.status(t0()),
            Err(TrialError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_file_store_persists() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("state/trial.json");

        let mut gate = TrialGate::new(FileStore::open(&path)?);
        gate.start(t0())?;

        let reopened = TrialGate::new(FileStore::open(&path)?);
        assert!(reopened.status(t0())?.active);
        Ok(())
    }
}
