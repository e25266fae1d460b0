pub mod image;
pub mod prediction;
pub mod search;

pub use image::*;
pub use prediction::*;
pub use search::*;
