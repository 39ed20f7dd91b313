/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The analyzer's state machine (analyzer.rs)
/// - The error taxonomy shown to the user (error.rs)

pub mod analyzer;
pub mod data;
pub mod error;
