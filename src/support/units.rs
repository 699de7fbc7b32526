//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical quantities crossing its public API
//! (pressures, volumes, lengths, times). This module provides quantities that are
//! useful for gas-flow modeling but aren't included in [`uom`].

mod quantities;

pub use quantities::SpecificGasConstant;
