pub mod image_validator;
pub mod product_processor;

pub use image_validator::is_valid_image;
pub use product_processor::{ProcessError, ProductProcessor};
