pub mod app;
pub mod utils;
pub mod views;

pub use app::{Command, Household, build_registry, load_reference_data, resolve_as_of, run};
