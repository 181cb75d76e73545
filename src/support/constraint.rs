//! Type-level numeric constraints.
//!
//! A [`Constrained<T, C>`] can only be built from a value that satisfies the
//! marker constraint `C`, so downstream code can rely on the invariant without
//! re-checking it.
//!
//! # Provided constraints
//!
//! - [`StrictlyPositive`]: Greater than zero
//! - [`UnitIntervalLowerOpen`]: Lower-open unit interval `0 < x ≤ 1`
//!
//! New invariants are added by implementing [`Constraint<T>`] for a
//! zero-sized marker type.

mod strictly_positive;
mod unit_interval;

use std::marker::PhantomData;

use thiserror::Error;

pub use strictly_positive::StrictlyPositive;
pub use unit_interval::{UnitBounds, UnitIntervalLowerOpen};

/// A numeric invariant checked when a [`Constrained`] value is built.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
    #[error("value is above the maximum allowed")]
    AboveMaximum,
}

/// A value that is known to satisfy the constraint `C`.
///
/// # Example
///
/// ```
/// use humidifier_models::support::constraint::{Constrained, UnitIntervalLowerOpen};
///
/// let relax = Constrained::<f64, UnitIntervalLowerOpen>::new(0.7).unwrap();
/// assert_eq!(relax.into_inner(), 0.7);
///
/// assert!(Constrained::<f64, UnitIntervalLowerOpen>::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, C: Constraint<T>> Constrained<T, C> {
    /// Returns a copy of the inner value.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
