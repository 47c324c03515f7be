//! Temperature / atmospheric pressure dashboard.
//!
//! The data path is a plain function pipeline: [`data::source`] obtains the
//! table, [`data::loader`] parses it into an immutable [`data::model::Dataset`],
//! and [`pipeline::recompute`] turns a [`data::filter::YearRange`] into a
//! [`pipeline::DashboardView`] that the egui layer in [`app`] and [`ui`]
//! renders.

pub mod analysis;
pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod ui;
