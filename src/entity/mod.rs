//! SeaORM entity definitions.

pub mod report;

pub use report::Entity as Report;
