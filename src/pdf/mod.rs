//! PDF inspection module

pub mod document;
pub mod resources;
pub mod xobject;
pub mod image;
pub mod inventory;

// Re-export commonly used items
pub use document::{DocumentModel, PdfDocument};
pub use resources::{resolve_resources, ObjectReference, ResourceValue};
pub use xobject::{scan_xobjects, XObjectEntry};
pub use image::{classify, extract, is_image_xobject, ImageStreamDescriptor};
pub use inventory::{
    inventory_images, scan_document, scan_page, ImageRecord, Inventory, PageImages,
};
