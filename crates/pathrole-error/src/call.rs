// Call error
// Result of invoking a wrapped callable: either the engine refused, or the
// callable itself failed after validation passed

use std::error::Error as StdError;
use std::fmt;

use crate::EffectError;

/// Error returned by a validated call.
///
/// `Refused` means the callable was never invoked. `Callable` carries the
/// callable's own error exactly as it returned it.
#[derive(Debug)]
pub enum CallError<E> {
    Refused(EffectError),
    Callable(E),
}

impl<E> CallError<E> {
    pub fn is_refused(&self) -> bool {
        matches!(self, CallError::Refused(_))
    }

    pub fn refusal(&self) -> Option<&EffectError> {
        match self {
            CallError::Refused(err) => Some(err),
            CallError::Callable(_) => None,
        }
    }

    /// The callable's own error, if the engine delegated and the callable failed
    pub fn into_callable(self) -> Option<E> {
        match self {
            CallError::Refused(_) => None,
            CallError::Callable(err) => Some(err),
        }
    }
}

impl<E> From<EffectError> for CallError<E> {
    fn from(err: EffectError) -> Self {
        CallError::Refused(err)
    }
}

impl<E: fmt::Display> fmt::Display for CallError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Refused(err) => write!(f, "Call refused: {}", err),
            CallError::Callable(err) => write!(f, "{}", err),
        }
    }
}

impl<E> StdError for CallError<E>
where
    E: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CallError::Refused(err) => Some(err),
            CallError::Callable(err) => err.source(),
        }
    }
}
