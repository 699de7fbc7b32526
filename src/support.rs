//! Supporting utilities shared by the models in this crate.
//!
//! These modules are public because they are useful on their own, but their
//! APIs are not yet stable.

pub mod constraint;
pub mod gas;
pub mod observe;
pub mod quadrature;
pub mod root;
pub mod units;
