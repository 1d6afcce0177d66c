//! Snapshot and apply engine.
//!
//! `Collector` and `Reconstructor` do the walking and replaying over the graph
//! collaborators. `TemplateService` ties them to the store and the confirmation gate and
//! is what the bot and HTTP layers call.

pub mod collector;
pub mod confirmation;
pub mod progress;
pub mod reconstructor;
pub mod template;
