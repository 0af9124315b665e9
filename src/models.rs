//! Public magnetorquer models.
//!
//! # Organization
//!
//! Models are grouped by domain. Today there is a single domain,
//! [`magnetorquer`], covering planar PCB coils.
//!
//! # Model structure
//!
//! Geometry models are plain values implementing a small trait (for example
//! [`magnetorquer::SpiralGeometry`]). The solvers built on top of them expose
//! each inversion as a [`twine_core::Model`] adapter so that the
//! [`twine_solvers`] bisection can drive it, mirroring how the solvers are
//! layered: geometry, then resistance matching, then length optimization,
//! then multi-layer allocation.

pub mod magnetorquer;
