//! Guildprint Test Utils
//!
//! Provides shared testing utilities for the guildprint bot. This crate offers a builder
//! for test contexts backed by in-memory SQLite databases, factories for store records,
//! and factories for Serenity model objects.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Store record factories
//! - **serenity**: Serenity model factories built from Discord-shaped JSON
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_template_store() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_template_tables().build().await?;
//!
//!     let db = test.db.as_ref().unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
