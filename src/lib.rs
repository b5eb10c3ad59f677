//! Blops application layer: configuration loading, the headless driver and
//! re-exports of the engine crates under `model`.

pub mod app;
pub mod model;
