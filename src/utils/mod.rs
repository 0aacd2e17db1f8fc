//! Utility functions and types

pub mod data_loader;
pub mod frame;

pub use data_loader::{DataLoader, DataSaver};
