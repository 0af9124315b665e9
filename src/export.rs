//! Fabrication output for optimized designs.

pub mod kicad;
