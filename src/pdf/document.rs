//! Read-only document model backed by lopdf

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::pdf::ObjectReference;

/// The view of a loaded PDF that image scanning depends on.
///
/// Every method takes `&self`; a scan never mutates the document.
pub trait DocumentModel {
    /// Number of pages the document declares
    fn page_count(&self) -> u32;

    /// Dictionary of a 1-indexed page
    fn page_dictionary(&self, page_number: u32) -> Result<&Dictionary>;

    /// Look a reference up in the object table, exactly once
    fn dereference(&self, reference: ObjectReference) -> Result<&Object>;

    /// Dereference an object that is expected to be a stream
    fn dereference_stream(&self, reference: ObjectReference) -> Result<&Stream> {
        match self.dereference(reference)? {
            Object::Stream(stream) => Ok(stream),
            other => Err(Error::UnexpectedType {
                reference,
                expected: "stream",
                found: object_type_name(other),
            }),
        }
    }
}

/// Short name of an object's type, for error messages and logs
pub(crate) fn object_type_name(object: &Object) -> &'static str {
    match object {
        Object::Boolean(_) => "boolean",
        Object::Integer(_) => "integer",
        Object::Real(_) => "real",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
        _ => "null",
    }
}

/// A PDF loaded with lopdf
pub struct PdfDocument {
    inner: Document,
    /// Page object IDs from the page tree, keyed by 1-based page number
    page_ids: BTreeMap<u32, ObjectId>,
    /// Count declared by the catalog's Pages node
    page_count: u32,
}

impl PdfDocument {
    /// Load a PDF from disk
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let doc = Document::load(path)?;
        Self::from_document(doc)
    }

    /// Load a PDF from an in-memory buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes)?;
        Self::from_document(doc)
    }

    /// Wrap an already loaded document
    pub fn from_document(doc: Document) -> Result<Self> {
        let page_count = count_pages_from_catalog(&doc)?;
        let page_ids = doc.get_pages();

        if page_ids.len() != page_count as usize {
            log::warn!(
                "Pages node declares {} pages but the page tree has {}",
                page_count,
                page_ids.len()
            );
        }

        Ok(Self {
            inner: doc,
            page_ids,
            page_count,
        })
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("page_count", &self.page_count)
            .field("pages_in_tree", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl DocumentModel for PdfDocument {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_dictionary(&self, page_number: u32) -> Result<&Dictionary> {
        let not_found = || Error::PageNotFound {
            page: page_number,
            page_count: self.page_count,
        };

        if page_number == 0 || page_number > self.page_count {
            return Err(not_found());
        }

        let page_id = *self.page_ids.get(&page_number).ok_or_else(not_found)?;

        match self.dereference(page_id.into())? {
            Object::Dictionary(dict) => Ok(dict),
            other => Err(Error::UnexpectedType {
                reference: page_id.into(),
                expected: "dictionary",
                found: object_type_name(other),
            }),
        }
    }

    fn dereference(&self, reference: ObjectReference) -> Result<&Object> {
        // Document::get_object would follow reference chains; stay at one hop.
        self.inner
            .objects
            .get(&reference.id())
            .ok_or(Error::Dereference(reference))
    }
}

/// Count pages by reading the Count field from the Pages dictionary
fn count_pages_from_catalog(doc: &Document) -> Result<u32> {
    let catalog_ref = doc.trailer.get(b"Root")
        .map_err(|_| Error::General("No Root in trailer".to_string()))?;

    let catalog_id = match catalog_ref {
        Object::Reference(id) => *id,
        _ => return Err(Error::General("Root is not a reference".to_string())),
    };

    let catalog_dict = match doc.get_object(catalog_id)? {
        Object::Dictionary(dict) => dict,
        _ => return Err(Error::General("Catalog is not a dictionary".to_string())),
    };

    let pages_id = match catalog_dict.get(b"Pages") {
        Ok(Object::Reference(id)) => *id,
        Ok(_) => return Err(Error::General("Pages is not a reference".to_string())),
        Err(_) => return Err(Error::General("No Pages in catalog".to_string())),
    };

    let pages_dict = match doc.get_object(pages_id)? {
        Object::Dictionary(dict) => dict,
        _ => return Err(Error::General("Pages is not a dictionary".to_string())),
    };

    match pages_dict.get(b"Count") {
        Ok(Object::Integer(n)) => u32::try_from(*n)
            .map_err(|_| Error::General(format!("Count {} is out of range", n))),
        Ok(_) => Err(Error::General("Count is not an integer".to_string())),
        Err(_) => Err(Error::General("No Count in Pages".to_string())),
    }
}
