//! Discord front end.
//!
//! A thin text-command layer over `TemplateService`. The graph collaborators it hands
//! to the engine live in `graph::discord`.

pub mod confirmation;
pub mod embed;
pub mod handler;
pub mod progress;
pub mod start;
