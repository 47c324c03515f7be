/// Derived views over a filtered subset: headline metrics, grouped
/// aggregates and distribution shapes. Everything here is a pure function
/// of `&[&Observation]`.

pub mod aggregate;
pub mod distribution;
pub mod stats;
pub mod summary;
