//! NRM Agents Prelude: convenient imports for common usage.

pub use crate::lineage::{composed_payload, offspring_payload, split_payload};
pub use crate::reproduction::{
    DensityDependent, NoReproduction, PoissonBirths, ReproductionContext, ReproductionPolicy,
    TrophicReproduction,
};
