//! Job analysis pipeline plus the documents generated per job.

pub mod handlers;
pub mod service;
