//! Page resource resolution
//!
//! Dictionary-valued entries such as `/Resources` and `/XObject` may be
//! written inline or as an indirect reference. [`ResourceValue`] captures
//! both forms, and [`ResourceValue::resolve`] is the single place where a
//! reference is followed. It follows at most one hop.

use std::fmt;

use lopdf::{Dictionary, Object, ObjectId};
use crate::pdf::document::{object_type_name, DocumentModel};

/// Identity of an indirect object: `(object number, generation number)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectReference {
    pub object_number: u32,
    pub generation_number: u16,
}

impl ObjectReference {
    pub fn new(object_number: u32, generation_number: u16) -> Self {
        Self {
            object_number,
            generation_number,
        }
    }

    /// The lopdf object ID for this reference
    pub fn id(&self) -> ObjectId {
        (self.object_number, self.generation_number)
    }
}

impl From<ObjectId> for ObjectReference {
    fn from((object_number, generation_number): ObjectId) -> Self {
        Self::new(object_number, generation_number)
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.object_number, self.generation_number)
    }
}

/// A dictionary-valued entry as found in its parent dictionary
#[derive(Debug, Clone, Copy)]
pub enum ResourceValue<'a> {
    /// Inline dictionary
    Direct(&'a Dictionary),
    /// Reference still to be followed
    Indirect(ObjectReference),
    /// Missing, wrong-typed, or unresolvable
    Absent,
}

impl<'a> ResourceValue<'a> {
    /// Classify `parent[key]` without dereferencing anything
    pub fn lookup(parent: &'a Dictionary, key: &[u8]) -> Self {
        match parent.get(key) {
            Ok(Object::Dictionary(dict)) => ResourceValue::Direct(dict),
            Ok(Object::Reference(id)) => ResourceValue::Indirect((*id).into()),
            Ok(other) => {
                log::debug!(
                    "/{} is a {}, not a dictionary",
                    String::from_utf8_lossy(key),
                    object_type_name(other)
                );
                ResourceValue::Absent
            }
            Err(_) => ResourceValue::Absent,
        }
    }

    /// Follow an indirect value once.
    ///
    /// The result is never `Indirect`: a reference that does not land on a
    /// dictionary (including one that lands on another reference) is `Absent`.
    pub fn resolve<M: DocumentModel + ?Sized>(self, model: &'a M) -> ResourceValue<'a> {
        match self {
            ResourceValue::Indirect(reference) => match model.dereference(reference) {
                Ok(Object::Dictionary(dict)) => ResourceValue::Direct(dict),
                Ok(other) => {
                    log::debug!(
                        "{} is a {}, not a dictionary",
                        reference,
                        object_type_name(other)
                    );
                    ResourceValue::Absent
                }
                Err(e) => {
                    log::debug!("{}", e);
                    ResourceValue::Absent
                }
            },
            resolved => resolved,
        }
    }

    /// The dictionary, if this value holds one inline
    pub fn as_dictionary(&self) -> Option<&'a Dictionary> {
        match *self {
            ResourceValue::Direct(dict) => Some(dict),
            _ => None,
        }
    }
}

/// Look up and resolve a dictionary-valued entry of `parent`
pub(crate) fn resolve_entry<'a, M: DocumentModel + ?Sized>(
    model: &'a M,
    parent: &'a Dictionary,
    key: &[u8],
) -> ResourceValue<'a> {
    ResourceValue::lookup(parent, key).resolve(model)
}

/// Effective Resources dictionary of a page.
///
/// Resources inherited from an ancestor Pages node are not consulted; a page
/// without its own `/Resources` entry yields `Absent`.
pub fn resolve_resources<'a, M: DocumentModel + ?Sized>(
    model: &'a M,
    page_dict: &'a Dictionary,
) -> ResourceValue<'a> {
    resolve_entry(model, page_dict, b"Resources")
}
