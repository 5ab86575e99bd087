//! Page-by-page image inventory

use std::path::Path;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::pdf::document::{DocumentModel, PdfDocument};
use crate::pdf::image::{classify, ImageStreamDescriptor};
use crate::pdf::resources::resolve_resources;
use crate::pdf::xobject::{scan_xobjects, XObjectEntry};

/// One image found on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// 1-based page number
    pub page_number: u32,
    pub object_number: u32,
    pub generation_number: u16,
    /// Resource name without the leading slash, e.g. `Im0`
    pub name: String,
    #[serde(serialize_with = "zero_if_absent")]
    pub width: Option<i64>,
    #[serde(serialize_with = "zero_if_absent")]
    pub height: Option<i64>,
    #[serde(serialize_with = "empty_if_absent")]
    pub color_space: Option<String>,
    #[serde(serialize_with = "zero_if_absent")]
    pub bits_per_component: Option<i64>,
    pub filter_chain: Vec<String>,
    pub raw_byte_length: usize,
}

impl ImageRecord {
    fn new(page_number: u32, entry: XObjectEntry, descriptor: ImageStreamDescriptor) -> Self {
        Self {
            page_number,
            object_number: entry.reference.object_number,
            generation_number: entry.reference.generation_number,
            name: entry.name,
            width: descriptor.width,
            height: descriptor.height,
            color_space: descriptor.color_space,
            bits_per_component: descriptor.bits_per_component,
            filter_chain: descriptor.filter_chain,
            raw_byte_length: descriptor.raw_byte_length,
        }
    }

    /// Filter chain as a comma-separated list, empty if unfiltered
    pub fn filter_display(&self) -> String {
        self.filter_chain.join(", ")
    }
}

// Absent optional fields are reported the same as zero / empty.
fn zero_if_absent<S: Serializer>(value: &Option<i64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.unwrap_or(0))
}

fn empty_if_absent<S: Serializer>(value: &Option<String>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

/// Images found on a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageImages {
    pub page_number: u32,
    pub images: Vec<ImageRecord>,
}

/// Images of a whole document, one entry per page in page order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Number of pages the document declares
    pub page_count: u32,
    /// Sum of the per-page image counts
    pub total_images: usize,
    pub pages: Vec<PageImages>,
}

impl Inventory {
    /// All records, page by page
    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.pages.iter().flat_map(|page| page.images.iter())
    }

    /// Pages that have at least one image
    pub fn pages_with_images(&self) -> impl Iterator<Item = &PageImages> {
        self.pages.iter().filter(|page| !page.images.is_empty())
    }
}

/// Collect the image XObjects referenced from one page's own resources.
///
/// Missing or malformed resources, XObject dictionaries and entries give
/// fewer records, never an error. Only a page that cannot be looked up fails.
pub fn scan_page<M: DocumentModel + ?Sized>(model: &M, page_number: u32) -> Result<Vec<ImageRecord>> {
    let page_dict = model.page_dictionary(page_number)?;

    let Some(resources) = resolve_resources(model, page_dict).as_dictionary() else {
        log::debug!("Page {}: no usable Resources", page_number);
        return Ok(Vec::new());
    };

    let images: Vec<ImageRecord> = scan_xobjects(model, resources)
        .into_iter()
        .filter_map(|entry| {
            let descriptor = classify(model, &entry)?;
            Some(ImageRecord::new(page_number, entry, descriptor))
        })
        .collect();

    log::debug!("Page {}: {} images", page_number, images.len());
    Ok(images)
}

/// Scan every page in order.
///
/// Fails if the document declares no pages, or on the first page that
/// cannot be looked up.
pub fn scan_document<M: DocumentModel + ?Sized>(model: &M) -> Result<Inventory> {
    let page_count = model.page_count();
    if page_count == 0 {
        return Err(Error::NoPages);
    }

    // The declared count is untrusted; a page missing from the tree fails below.
    let mut pages = Vec::new();
    let mut total_images = 0;

    for page_number in 1..=page_count {
        let images = scan_page(model, page_number).map_err(|e| Error::Page {
            page: page_number,
            source: Box::new(e),
        })?;
        total_images += images.len();
        pages.push(PageImages { page_number, images });
    }

    log::info!("Found {} images on {} pages", total_images, page_count);

    Ok(Inventory {
        page_count,
        total_images,
        pages,
    })
}

/// Load a PDF file and inventory its images
pub fn inventory_images(path: &Path) -> Result<Inventory> {
    let document = PdfDocument::open(path)?;
    scan_document(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::document::tests::document_with_pages;
    use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

    fn add_image(doc: &mut Document, width: i64, height: i64, data: &[u8]) -> ObjectId {
        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
            },
            data.to_vec(),
        ))
    }

    fn add_form(doc: &mut Document) -> ObjectId {
        doc.add_object(Stream::new(
            dictionary! { "Type" => "XObject", "Subtype" => "Form" },
            b"q Q".to_vec(),
        ))
    }

    fn page_with_xobjects(xobjects: Dictionary) -> Dictionary {
        dictionary! {
            "Resources" => dictionary! { "XObject" => xobjects },
        }
    }

    #[test]
    fn test_scan_page_counts_only_images() {
        let mut doc = Document::with_version("1.5");
        let im0 = add_image(&mut doc, 4, 3, &[0; 12]);
        let im1 = add_image(&mut doc, 1, 1, &[0]);
        let fm0 = add_form(&mut doc);
        document_with_pages(
            &mut doc,
            vec![page_with_xobjects(dictionary! {
                "Im0" => im0,
                "Im1" => im1,
                "Fm0" => fm0,
                "Gone" => (321u32, 0u16),
            })],
        );
        let pdf = PdfDocument::from_document(doc).unwrap();

        let mut records = scan_page(&pdf, 1).unwrap();
        records.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Im0");
        assert_eq!(records[0].object_number, im0.0);
        assert_eq!(records[0].generation_number, im0.1);
        assert_eq!(records[0].page_number, 1);
        assert_eq!((records[0].width, records[0].height), (Some(4), Some(3)));
        assert_eq!(records[0].raw_byte_length, 12);
        assert_eq!(records[1].name, "Im1");
    }

    #[test]
    fn test_page_without_resources_has_no_images() {
        let mut doc = Document::with_version("1.5");
        document_with_pages(&mut doc, vec![dictionary! {}]);
        let pdf = PdfDocument::from_document(doc).unwrap();

        assert!(scan_page(&pdf, 1).unwrap().is_empty());
    }

    #[test]
    fn test_page_without_xobjects_has_no_images() {
        let mut doc = Document::with_version("1.5");
        document_with_pages(
            &mut doc,
            vec![dictionary! { "Resources" => dictionary! { "Font" => dictionary! {} } }],
        );
        let pdf = PdfDocument::from_document(doc).unwrap();

        assert!(scan_page(&pdf, 1).unwrap().is_empty());
    }

    #[test]
    fn test_scan_document_aggregates_pages() {
        let mut doc = Document::with_version("1.5");
        let shared = add_image(&mut doc, 10, 10, &[1, 2, 3]);
        let other = add_image(&mut doc, 20, 5, &[4, 5]);
        let xobjects = doc.add_object(dictionary! { "A" => shared, "B" => other });
        let resources = doc.add_object(dictionary! { "XObject" => xobjects });
        document_with_pages(
            &mut doc,
            vec![
                page_with_xobjects(dictionary! { "Im0" => shared }),
                dictionary! {},
                dictionary! { "Resources" => resources },
            ],
        );
        let pdf = PdfDocument::from_document(doc).unwrap();

        let inventory = scan_document(&pdf).unwrap();
        assert_eq!(inventory.page_count, 3);
        assert_eq!(inventory.pages.len(), 3);
        assert_eq!(
            inventory.pages.iter().map(|p| p.images.len()).collect::<Vec<_>>(),
            vec![1, 0, 2]
        );
        assert_eq!(inventory.total_images, 3);
        assert_eq!(inventory.records().count(), inventory.total_images);
        assert_eq!(
            inventory.pages_with_images().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(inventory.records().all(|r| r.page_number != 2));
    }

    #[test]
    fn test_scan_is_repeatable() {
        let mut doc = Document::with_version("1.5");
        let im = add_image(&mut doc, 8, 8, &[0; 64]);
        document_with_pages(&mut doc, vec![page_with_xobjects(dictionary! { "Im0" => im })]);
        let pdf = PdfDocument::from_document(doc).unwrap();

        assert_eq!(scan_document(&pdf).unwrap(), scan_document(&pdf).unwrap());
    }

    #[test]
    fn test_zero_pages_fails() {
        let mut doc = Document::with_version("1.5");
        document_with_pages(&mut doc, vec![]);
        let pdf = PdfDocument::from_document(doc).unwrap();

        assert!(matches!(scan_document(&pdf), Err(Error::NoPages)));
    }

    /// Overwrite the Pages node's declared Count
    fn set_declared_count(doc: &mut Document, count: i64) {
        let catalog_id = match doc.trailer.get(b"Root").unwrap() {
            Object::Reference(id) => *id,
            _ => unreachable!(),
        };
        let pages_id = match doc.get_dictionary(catalog_id).unwrap().get(b"Pages").unwrap() {
            Object::Reference(id) => *id,
            _ => unreachable!(),
        };
        if let Ok(Object::Dictionary(pages)) = doc.get_object_mut(pages_id) {
            pages.set("Count", count);
        }
    }

    fn assert_fails_on_page_2(pdf: &PdfDocument) {
        match scan_document(pdf).unwrap_err() {
            Error::Page { page, source } => {
                assert_eq!(page, 2);
                assert!(matches!(*source, Error::PageNotFound { page: 2, .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_page_aborts_with_page_context() {
        let mut doc = Document::with_version("1.5");
        document_with_pages(&mut doc, vec![dictionary! {}]);
        set_declared_count(&mut doc, 2);
        let pdf = PdfDocument::from_document(doc).unwrap();

        assert_fails_on_page_2(&pdf);
    }

    #[test]
    fn test_inflated_count_fails_on_first_missing_page() {
        let mut doc = Document::with_version("1.5");
        document_with_pages(&mut doc, vec![dictionary! {}]);
        set_declared_count(&mut doc, 4_000_000_000);
        let pdf = PdfDocument::from_document(doc).unwrap();

        assert_eq!(pdf.page_count(), 4_000_000_000);
        assert_fails_on_page_2(&pdf);
    }

    #[test]
    fn test_error_message_names_cause_once() {
        let mut doc = Document::with_version("1.5");
        document_with_pages(&mut doc, vec![dictionary! {}]);
        set_declared_count(&mut doc, 2);
        let pdf = PdfDocument::from_document(doc).unwrap();

        let err = scan_document(&pdf).unwrap_err();
        assert_eq!(err.to_string(), "failed to extract images from page 2");
        let cause = std::error::Error::source(&err).expect("page error should carry its cause");
        assert_eq!(cause.to_string(), "Page 2 not found (document has 2 pages)");
    }

    #[test]
    fn test_json_reports_absent_fields_as_zero() {
        let record = ImageRecord {
            page_number: 1,
            object_number: 5,
            generation_number: 0,
            name: "Im0".to_string(),
            width: None,
            height: Some(7),
            color_space: None,
            bits_per_component: None,
            filter_chain: vec!["FlateDecode".to_string()],
            raw_byte_length: 99,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["width"], 0);
        assert_eq!(json["height"], 7);
        assert_eq!(json["color_space"], "");
        assert_eq!(json["bits_per_component"], 0);
        assert_eq!(json["filter_chain"][0], "FlateDecode");
    }
}
