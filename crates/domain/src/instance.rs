//! Instance — a provisioned compute resource owned by the provider.
//!
//! This routine only reads instances and requests transitions; it never
//! caches them across invocations.

mod state;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RightsizeError, ValidationError};
use crate::policy::DEFAULT_TARGET_INSTANCE_TYPE;

pub use state::LifecycleState;

macro_rules! define_name {
    ($(#[doc = $doc:expr])* $name:ident, $empty:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a provider value, rejecting empty strings.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError`] when `value` is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::$empty);
                }
                Ok(Self(value))
            }

            /// Borrow the raw provider value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_name!(
    /// Opaque provider identifier of an [`Instance`] (e.g. `i-0abc…`).
    InstanceId,
    EmptyInstanceId
);

define_name!(
    /// Configuration class (size tier) of an [`Instance`] (e.g. `t2.micro`).
    InstanceType,
    EmptyInstanceType
);

impl Default for InstanceType {
    fn default() -> Self {
        Self(DEFAULT_TARGET_INSTANCE_TYPE.to_string())
    }
}

/// A compute instance as observed at enumeration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub instance_type: InstanceType,
    pub state: LifecycleState,
}

impl Instance {
    /// Create a builder for constructing an [`Instance`].
    #[must_use]
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::default()
    }

    /// Whether the instance already runs with `target`.
    #[must_use]
    pub fn is_at(&self, target: &InstanceType) -> bool {
        &self.instance_type == target
    }
}

/// Step-by-step builder for [`Instance`].
#[derive(Debug, Default)]
pub struct InstanceBuilder {
    id: Option<String>,
    instance_type: Option<String>,
    state: LifecycleState,
}

impl InstanceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: LifecycleState) -> Self {
        self.state = state;
        self
    }

    /// Consume the builder, validate, and return an [`Instance`].
    ///
    /// # Errors
    ///
    /// Returns [`RightsizeError::Validation`] if the id or type is missing or empty.
    pub fn build(self) -> Result<Instance, RightsizeError> {
        Ok(Instance {
            id: InstanceId::new(self.id.unwrap_or_default())?,
            instance_type: InstanceType::new(self.instance_type.unwrap_or_default())?,
            state: self.state,
        })
    }
}

/// Instances returned by the enumerator, split by lifecycle state.
///
/// Both lists keep the provider's enumeration order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub running: Vec<Instance>,
    pub stopped: Vec<Instance>,
}

impl Inventory {
    /// Partition instances into running and stopped; anything else is dropped.
    #[must_use]
    pub fn partition(instances: impl IntoIterator<Item = Instance>) -> Self {
        let mut inventory = Self::default();
        for instance in instances {
            match instance.state {
                LifecycleState::Running => inventory.running.push(instance),
                LifecycleState::Stopped => inventory.stopped.push(instance),
                LifecycleState::Other(_) => {}
            }
        }
        inventory
    }

    /// Total number of actionable instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len() + self.stopped.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
