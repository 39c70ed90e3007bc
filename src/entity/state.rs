//! Runtime state of a monitored entity.
//!
//! # States
//! - Stopped: no PID / not running
//! - Running: started, optionally with a PID and last keep-alive
//!
//! # State Transitions
//! ```text
//! Stopped → Running: mark_started
//! Running → Stopped: mark_stopped (appends a History entry)
//! ```
//!
//! # Design Decisions
//! - Owned by exactly one entity behind that entity's own lock
//! - History is a bounded ring; the oldest entry is dropped first

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::timestamp::Timestamp;

/// One completed run of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct History {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<Timestamp>,
    pub stopped: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub restart: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub run_once: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub shutdown: bool,
}

/// Mutable state of one app or service.
#[derive(Debug, Clone)]
pub struct RunState {
    pub(crate) pid: Option<u32>,
    pub(crate) started: Option<DateTime<Utc>>,
    pub(crate) last_seen: Option<DateTime<Utc>>,
    pub(crate) disabled: bool,
    pub(crate) restart: bool,
    pub(crate) run_once: bool,
    pub(crate) shutdown: bool,
    pub(crate) history: VecDeque<History>,
    history_limit: usize,
    format: Arc<str>,
}

impl RunState {
    /// Create a stopped state.
    pub fn new(disabled: bool, history_limit: usize, format: Arc<str>) -> Self {
        Self {
            pid: None,
            started: None,
            last_seen: None,
            disabled,
            restart: false,
            run_once: false,
            shutdown: false,
            history: VecDeque::with_capacity(history_limit),
            history_limit,
            format,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn history(&self) -> impl Iterator<Item = &History> {
        self.history.iter()
    }

    /// Record a (re)start. Clears a pending restart request.
    pub fn mark_started(&mut self, pid: Option<u32>, at: DateTime<Utc>) {
        self.pid = pid;
        self.started = Some(at);
        self.last_seen = Some(at);
        self.restart = false;
    }

    /// Record a keep-alive observation.
    pub fn mark_seen(&mut self, at: DateTime<Utc>) {
        self.last_seen = Some(at);
    }

    /// Record the end of a run and append it to history.
    ///
    /// A no-op when not running.
    pub fn mark_stopped(&mut self, exit_code: Option<i32>, at: DateTime<Utc>) {
        let Some(started) = self.started.take() else {
            return;
        };
        let entry = History {
            pid: self.pid.take(),
            started: Some(self.stamp(started)),
            stopped: self.stamp(at),
            last_seen: self.last_seen.take().map(|t| self.stamp(t)),
            exit_code,
            disabled: self.disabled,
            restart: self.restart,
            run_once: self.run_once,
            shutdown: self.shutdown,
        };
        self.push_history(entry);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    pub fn set_run_once(&mut self, run_once: bool) {
        self.run_once = run_once;
    }

    pub fn set_shutdown(&mut self) {
        self.shutdown = true;
    }

    pub(crate) fn stamp(&self, time: DateTime<Utc>) -> Timestamp {
        Timestamp::new(time, self.format.clone())
    }

    fn push_history(&mut self, entry: History) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }
}
