//! # Twine Gas Transfer
//!
//! Orifice and capillary sizing for rigid vessels that are blown down or filled
//! through a single restriction, built on
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! Given a target transfer time the crate finds the restriction diameter, and
//! given a diameter it finds the transfer time. Gas is treated as ideal and the
//! vessel as isothermal.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once it is useful across models or outside this crate.
//! Model-specific code remains private.

pub mod models;
pub mod support;
