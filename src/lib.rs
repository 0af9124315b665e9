//! # Magnetorquer Models
//!
//! Geometry and optimization models for flat spiral coils ("magnetorquers")
//! etched on printed-circuit boards. Built on
//! [Twine](https://github.com/isentropic-dev/twine) models and solvers.
//!
//! The figure of merit throughout is the area-sum, the total area enclosed
//! by every turn of a coil, which is proportional to the magnetic moment the
//! coil produces per unit current.
//!
//! ## Crate layout
//!
//! - [`config`]: The board description every model is built from.
//! - [`models`]: Spiral geometry, resistance matching and optimizers.
//! - [`export`]: KiCad text output for optimized designs.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Example
//!
//! ```no_run
//! use magnetorquer_models::{
//!     config::BoardConfig,
//!     models::magnetorquer::{
//!         AllocationConfig, AnySpiral, ConstantWidthOptimizer, SpiralFamily, allocate,
//!     },
//! };
//!
//! let board = BoardConfig::load("config/magnetorquer.toml")?;
//! let spiral = AnySpiral::new(SpiralFamily::Square, board.outer_radius)?;
//! let optimizer = ConstantWidthOptimizer::new(&board, spiral);
//!
//! let allocation = allocate(&board, &optimizer, &AllocationConfig::default())?;
//! println!("total area-sum: {:?}", allocation.total_area_sum);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod export;
pub mod models;
pub mod support;
