//! Lifecycle state — where an instance sits in the provider's state machine.

use serde::{Deserialize, Serialize};

/// Provider lifecycle state of an instance.
///
/// Only [`Running`](Self::Running) and [`Stopped`](Self::Stopped) are acted
/// upon; every other provider value is kept verbatim in
/// [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleState {
    Running,
    Stopped,
    Other(String),
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::Other("unknown".to_string())
    }
}

impl LifecycleState {
    /// Whether this state is one the routine reconfigures from.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Running | Self::Stopped)
    }

    /// Provider name of this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for LifecycleState {
    fn from(value: &str) -> Self {
        match value {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LifecycleState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<LifecycleState> for String {
    fn from(value: LifecycleState) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
