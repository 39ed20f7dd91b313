/// Analysis service module
///
/// The client side of the external `POST /analyze` endpoint. The
/// application only depends on the `AnalysisService` trait.

pub mod client;

pub use client::{AnalysisService, HttpAnalysisClient};
