//! egui rendering. Every function here reads from [`crate::state::AppState`]
//! or a [`crate::pipeline::DashboardView`]; none of them computes aggregates.

pub mod axis;
pub mod panels;
pub mod plot;
pub mod table;
