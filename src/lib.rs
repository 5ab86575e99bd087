//! PDF Image Inventory Library
//!
//! Lists every raster image embedded in a PDF, page by page.
//! This library provides functionality to:
//! - Resolve each page's resource dictionary and its XObject entries
//! - Tell image XObjects apart from forms and other XObjects
//! - Read image geometry, colorspace, bit depth, filter chain and stored size
//! - Render the collected records as a text or JSON report
//!
//! The document is only ever read; nothing here mutates it.
//!
//! # Example
//!
//! ```no_run
//! use pdf_image_inventory::pdf::inventory_images;
//! use std::path::Path;
//!
//! let inventory = inventory_images(Path::new("scan.pdf")).expect("Failed to scan PDF");
//! for record in inventory.records() {
//!     println!("page {}: {} ({} bytes)", record.page_number, record.name, record.raw_byte_length);
//! }
//! println!("{} images", inventory.total_images);
//! ```

pub mod error;
pub mod pdf;
pub mod report;

// Re-export commonly used items
pub use error::{Error, Result};
