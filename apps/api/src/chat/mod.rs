//! Per-job career-coach conversation.

pub mod handlers;
pub mod service;
