//! # Humidifier Models
//!
//! Steady-state heat and moisture exchange models for planar membrane
//! humidifiers, built as [Twine](https://github.com/isentropic-dev/twine)
//! models.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Logging
//!
//! The field solver reports progress through the [`log`] facade. Install any
//! `log` compatible logger to see per-iteration errors at `trace` level and
//! periodic progress at `debug` level.
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.

pub mod models;
pub mod support;
