pub mod core;
pub mod models;

pub use models::report::Report;
