//! Database repository layer.
//!
//! Repositories wrap SeaORM entities and hand domain models back to the service layer,
//! so nothing above this module touches entity types directly.

pub mod template;

#[cfg(test)]
mod test;
