use image::GenericImageView;

/// Anything shorter than this is an icon or a UI fragment, not a product
/// photo.
pub const MIN_IMAGE_HEIGHT: u32 = 200;

/// Decide whether raw bytes are a usable product photo: decodable image
/// data of at least the minimum height. Undecodable bytes never raise.
pub fn is_valid_image(content: &[u8]) -> bool {
    match image::load_from_memory(content) {
        Ok(decoded) => decoded.height() >= MIN_IMAGE_HEIGHT,
        Err(_) => false,
    }
}
