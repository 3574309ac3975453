use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// State tag usable by the [`StateMachine`](super::StateMachine) engine
///
/// `Default` must be the pre-start `none` marker every machine is built in.
/// `Display` is the persisted and logged name of the state.
pub trait MachineState:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Check if this is the pre-start marker
    fn is_none(&self) -> bool {
        *self == Self::default()
    }
}

/// Transition name usable by the engine
pub trait TransitionName: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> TransitionName for T where T: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}
