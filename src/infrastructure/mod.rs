//! Infrastructure layer - persistence adapters and logging

pub mod logging;
pub mod user;
