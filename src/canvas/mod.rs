pub mod mapper;
pub mod mask;

pub use mapper::{DisplaySize, PixelRect, ScaleMap, Selection};
pub use mask::{rect_mask, MaskCanvas, MASK_EDIT, MASK_KEEP};
