//! Domain models shared across the engine, store and bot layers.

pub mod api;
pub mod report;
pub mod template;
