//! Images of `image_gallery` blocks, kept in dense position order.

mod crud;
mod storage;
mod types;

pub use crud::{add_gallery_images, list_gallery_images, remove_gallery_image, replace_gallery};
pub use storage::GALLERY_IMAGES;
pub use types::{GalleryError, GalleryImage, ReplaceOutcome};
