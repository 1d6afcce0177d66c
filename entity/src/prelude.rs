pub use super::template::Entity as Template;
