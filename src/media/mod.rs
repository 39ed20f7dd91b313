/// Image file handling module
///
/// This module handles:
/// - Detecting the declared media type of picked and dropped files
/// - Reading accepted files into memory
/// - Generating previews off the UI thread

pub mod loader;
pub mod preview;
