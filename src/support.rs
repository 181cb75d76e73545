//! Crate-level utilities shared by the models.
//!
//! - [`constraint`]: Numeric invariants enforced at construction time.
//! - [`psychro`]: Closed-form moist-air property relations.
//!
//! These modules are public because they're useful on their own, but their
//! APIs are not stable.

pub mod constraint;
pub mod psychro;
