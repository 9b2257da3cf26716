use serde::Serialize;

use crate::errors::AdvanceError;

/// what a screen shows for one remote resource
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(reason) => Some(reason),
            _ => None,
        }
    }

    /// the state a finished call leaves behind
    pub fn from_result(result: Result<T, AdvanceError>, fallback: &str) -> Self {
        match result {
            Ok(data) => ViewState::Loaded(data),
            Err(err) => ViewState::Error(err.user_message(fallback)),
        }
    }
}

/// proof that a load was started; only the newest ticket may complete it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A screen's state for one resource.
///
/// `begin_load` hands out a ticket and moves to `Loading`. `complete`
/// only applies a result whose ticket is still current, so a slow
/// response for an earlier load, or any response after `unmount`, is
/// dropped.
#[derive(Debug, Clone)]
pub struct Screen<T> {
    state: ViewState<T>,
    generation: u64,
    mounted: bool,
}

impl<T> Default for Screen<T> {
    fn default() -> Self {
        Self {
            state: ViewState::Idle,
            generation: 0,
            mounted: true,
        }
    }
}

impl<T> Screen<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        if self.mounted {
            self.state = ViewState::Loading;
        }
        LoadTicket(self.generation)
    }

    /// Apply a finished load. Returns `false` when the result was stale
    /// and has been discarded.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<T, AdvanceError>, fallback: &str) -> bool {
        if !self.mounted || ticket.0 != self.generation {
            return false;
        }
        self.state = ViewState::from_result(result, fallback);
        true
    }

    /// the screen went away; nothing may update it from now on
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }
}
