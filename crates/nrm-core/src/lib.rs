//! # NRM Core
//!
//! Core types for the Nested Resonance Memory composition/decomposition
//! population model.
//!
//! Agents live at discrete depths. Each cycle they recharge, reproduce,
//! merge pairwise into the next depth when their phase vectors resonate,
//! split back down when their energy runs too high, and decay. This crate
//! holds the pieces shared by every part of that loop:
//!
//! - [`agent`]: the `Agent` value type and its optional payload
//! - [`params`]: `SimulationParameters` and their validation
//! - [`resonance`]: the phase-resonance similarity function
//! - [`error`]: the error taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use nrm_core::prelude::*;
//!
//! let params = SimulationParameters::default();
//! assert!(params.validate().is_ok());
//!
//! let r = resonance(1.0, 0, 1.2, 0, &params.resonance);
//! assert!(r > 0.8);
//! ```

pub mod agent;
pub mod error;
pub mod params;
pub mod prelude;
pub mod resonance;
pub mod types;
