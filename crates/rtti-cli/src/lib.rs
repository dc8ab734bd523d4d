//! Command-line front end for the runtime type engine.
//!
//! `rtti-check` loads a serialized descriptor document and either checks a
//! JSON value against it, relates two of its descriptors, or prints one.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
