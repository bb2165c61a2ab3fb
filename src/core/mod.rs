//! Core types: tool output model and the gateway error type.

pub mod content;
pub mod error;
