/// Views for the two routes and the styling they share

pub mod analyzer;
pub mod landing;
pub mod theme;
