use std::fmt::Display;

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StoreState {
    Open,
    Closed,
}

impl StoreState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }

    /// CSS class used by the status indicator on the hours page.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Open => "status-open",
            Self::Closed => "status-closed",
        }
    }
}

impl Display for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The outcome of one status computation: open or closed, plus a line explaining why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusVerdict {
    state: StoreState,
    detail: String,
}

impl StatusVerdict {
    pub fn open(detail: impl Into<String>) -> Self {
        Self {
            state: StoreState::Open,
            detail: detail.into(),
        }
    }

    pub fn closed(detail: impl Into<String>) -> Self {
        Self {
            state: StoreState::Closed,
            detail: detail.into(),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn is_open(&self) -> bool {
        self.state == StoreState::Open
    }
}

impl Display for StatusVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.state, self.detail)
    }
}
