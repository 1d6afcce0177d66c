//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON shaped like
//! Discord's API responses, so conversion code can be tested without a live guild.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_channel, create_test_role, ChannelOptions};
//!
//! let admin = create_test_role(111111111, "Admin", 0xFF0000, 10);
//! let chat = create_test_channel(222222222, 333333333, "chat", ChannelOptions::default());
//! ```
//!
//! # Available Factories
//!
//! - `role::create_test_role` / `role::create_test_managed_role` - Create Serenity Role objects
//! - `channel::create_test_channel` - Create Serenity GuildChannel objects
//! - `channel::create_test_overwrite` - Create Serenity PermissionOverwrite objects

pub mod channel;
pub mod role;

// Re-export commonly used functions for convenience
pub use channel::{create_test_channel, create_test_overwrite, ChannelOptions};
pub use role::{create_test_managed_role, create_test_role};
