//! Account, profile, and resume import.

pub mod handlers;
pub mod service;
pub mod upload;
