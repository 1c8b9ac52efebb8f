//! Step definitions for chat session lifecycle scenarios.

pub mod then;
