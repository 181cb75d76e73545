//! Public humidifier models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the actual computation and domain logic lives. The `core` module is an
//! implementation detail and is **not** re-exported as part of the public API;
//! the types a caller needs are re-exported from the model module itself.
//!
//! The [`twine_core::Model`] implementation is a thin adapter that validates
//! its input and delegates to the model-specific core API.

pub mod humidifier;
