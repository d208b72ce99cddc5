//! Context values carried through a path walk.
//!
//! A [`Context`] holds zero or one domain value. Every hop of a walk copies
//! the context forward with [`Context::duplicate`], so each state works on
//! its own private snapshot.

use thiserror::Error;

/// Raised when a context value cannot be duplicated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("context duplication failed: {reason}")]
pub struct CloneError {
    reason: String,
}

impl CloneError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Fallible deep copy.
///
/// Implemented for every `Clone` type. Types whose copy can fail (handles to
/// external resources, values with a copy budget) implement it by hand for a
/// type that is not `Clone`.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{CloneError, Duplicate};
///
/// struct Lease {
///     transferable: bool,
/// }
///
/// impl Duplicate for Lease {
///     fn duplicate(&self) -> Result<Self, CloneError> {
///         if self.transferable {
///             Ok(Lease { transferable: true })
///         } else {
///             Err(CloneError::new("lease is pinned to its holder"))
///         }
///     }
/// }
///
/// assert!(Lease { transferable: false }.duplicate().is_err());
/// ```
pub trait Duplicate: Sized {
    fn duplicate(&self) -> Result<Self, CloneError>;
}

impl<T: Clone> Duplicate for T {
    fn duplicate(&self) -> Result<Self, CloneError> {
        Ok(self.clone())
    }
}

/// Holder of an optional context value.
///
/// A context is owned by exactly one state slot (or by the machine, for the
/// initial context) and is never shared by reference across states.
///
/// # Example
///
/// ```rust
/// use waypoint::core::Context;
///
/// let original = Context::new(Some(vec![1, 2, 3]));
/// let mut copy = original.duplicate().unwrap();
/// copy.get_mut().unwrap().push(4);
///
/// assert_eq!(original.get(), Some(&vec![1, 2, 3]));
/// assert_eq!(copy.get(), Some(&vec![1, 2, 3, 4]));
/// ```
#[derive(Debug, PartialEq)]
pub struct Context<C> {
    value: Option<C>,
}

impl<C> Context<C> {
    pub fn new(value: Option<C>) -> Self {
        Self { value }
    }

    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Current value, no side effects.
    pub fn get(&self) -> Option<&C> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut C> {
        self.value.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn into_inner(self) -> Option<C> {
        self.value
    }
}

impl<C: Duplicate> Context<C> {
    /// Produce an independent deep copy of this context.
    ///
    /// An empty context duplicates to an empty context.
    pub fn duplicate(&self) -> Result<Self, CloneError> {
        let value = match &self.value {
            Some(value) => Some(value.duplicate()?),
            None => None,
        };
        Ok(Self { value })
    }
}

impl<C> Default for Context<C> {
    fn default() -> Self {
        Self::empty()
    }
}
