pub mod prelude;

pub mod template;
