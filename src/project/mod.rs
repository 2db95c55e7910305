//! Filesystem discovery for configuration sources.

mod loader;

pub use loader::{LoadError, discover};
