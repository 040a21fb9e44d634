//! App lifecycle state machine
//!
//! ```text
//! Created ──run()──► SettingUp ──setup() returns──► Executing
//!                                                       │
//!                          KycoShutdownEvent delivered  ▼
//!                                                  ShuttingDown
//!                                                       │
//!                               run unit returns        ▼
//!                                                   Terminated
//! ```
//!
//! Transitions only move forward. `Executing` may go straight to `Terminated`
//! when `execute` returns on its own.

use crate::error::NAppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Lifecycle state of an App instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AppState {
    Created,
    SettingUp,
    Executing,
    ShuttingDown,
    Terminated,
}

impl AppState {
    /// `SettingUp` or `Executing`
    pub fn is_running(self) -> bool {
        matches!(self, AppState::SettingUp | AppState::Executing)
    }

    pub fn is_terminated(self) -> bool {
        self == AppState::Terminated
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppState::Created => "created",
            AppState::SettingUp => "running/setting-up",
            AppState::Executing => "running/executing",
            AppState::ShuttingDown => "shutting-down",
            AppState::Terminated => "terminated",
        };
        f.write_str(label)
    }
}

/// Shared, forward-only lifecycle cell.
///
/// Readers subscribe through a watch channel so both the App's `execute` loop
/// and the host can wait for a state to be reached.
#[derive(Debug)]
pub struct Lifecycle {
    state: watch::Sender<AppState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AppState::Created);
        Self { state }
    }

    pub fn state(&self) -> AppState {
        *self.state.borrow()
    }

    /// `Created -> SettingUp`, the only transition that can fail
    pub fn start(&self) -> Result<(), NAppError> {
        let mut previous = AppState::Created;
        let started = self.state.send_if_modified(|state| {
            previous = *state;
            if *state == AppState::Created {
                *state = AppState::SettingUp;
                true
            } else {
                false
            }
        });

        if started {
            Ok(())
        } else {
            Err(NAppError::AlreadyStarted(previous))
        }
    }

    /// Move to `next` if it lies ahead of the current state.
    ///
    /// Returns the state that was replaced, or `None` when nothing changed.
    pub fn advance(&self, next: AppState) -> Option<AppState> {
        let mut previous = None;
        self.state.send_if_modified(|state| {
            if *state < next {
                previous = Some(*state);
                *state = next;
                true
            } else {
                false
            }
        });
        previous
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Wait until the state reaches at least `target`
    pub async fn reached(&self, target: AppState) -> AppState {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        // Bound first: the `Ref` borrows `rx` and must drop before it.
        let reached = match rx.wait_for(|state| *state >= target).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        };
        reached
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
