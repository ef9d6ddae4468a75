//! # NRM Agents
//!
//! Birth rules and inheritance for NRM agents.
//!
//! - **Reproduction policies**: who gives birth each cycle
//!   ([`DensityDependent`](reproduction::DensityDependent) for the base model,
//!   [`PoissonBirths`](reproduction::PoissonBirths),
//!   [`TrophicReproduction`](reproduction::TrophicReproduction),
//!   [`NoReproduction`](reproduction::NoReproduction))
//! - **Lineage**: how payloads pass from parents to children

pub mod lineage;
pub mod prelude;
pub mod reproduction;
