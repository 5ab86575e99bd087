//! XObject enumeration from a Resources dictionary

use lopdf::{Dictionary, Object};

use crate::pdf::document::{object_type_name, DocumentModel};
use crate::pdf::resources::{resolve_entry, ObjectReference};

/// A named entry of a page's `/XObject` dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XObjectEntry {
    pub name: String,
    pub reference: ObjectReference,
}

/// List the XObject entries of a Resources dictionary.
///
/// The `/XObject` entry may be inline or one reference away. Entries whose
/// value is not an indirect reference cannot be streams and are skipped.
/// Order follows the dictionary and is not otherwise guaranteed.
pub fn scan_xobjects<M: DocumentModel + ?Sized>(
    model: &M,
    resources: &Dictionary,
) -> Vec<XObjectEntry> {
    let Some(xobjects) = resolve_entry(model, resources, b"XObject").as_dictionary() else {
        log::debug!("No XObject dictionary in resources");
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(name, value)| {
            let name = String::from_utf8_lossy(name).to_string();
            match value {
                Object::Reference(id) => Some(XObjectEntry {
                    name,
                    reference: (*id).into(),
                }),
                other => {
                    log::debug!("Skipping XObject /{}: {} value", name, object_type_name(other));
                    None
                }
            }
        })
        .collect()
}
