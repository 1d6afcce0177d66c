//! Factory methods for creating test data.
//!
//! Each store table has its own factory module with both a `Factory` struct for
//! customization and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let record = factory::create_template(&db).await?;
//!
//! let record = factory::template::TemplateFactory::new(&db)
//!     .name("snapshot_1")
//!     .source_name("My Guild")
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod template;

pub use template::create_template;
