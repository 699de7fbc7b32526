//! Compressible gas flow models.

pub mod vessel;
