//! Core business logic for ajoclub.

pub mod services;

pub use services::*;
