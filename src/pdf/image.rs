//! Image XObject classification and metadata extraction

use lopdf::{Dictionary, Object, Stream};

use crate::pdf::document::DocumentModel;
use crate::pdf::xobject::XObjectEntry;

/// Fields read from a confirmed image XObject stream.
///
/// Optional fields are `None` when the entry is missing or has an
/// unexpected type; they are not defaulted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageStreamDescriptor {
    /// Width in pixels
    pub width: Option<i64>,
    /// Height in pixels
    pub height: Option<i64>,
    /// Color space family, e.g. `DeviceRGB` or `Indexed`
    pub color_space: Option<String>,
    /// Bits per component
    pub bits_per_component: Option<i64>,
    /// Filter names in the order they were applied
    pub filter_chain: Vec<String>,
    /// Size of the stored (still encoded) stream data
    pub raw_byte_length: usize,
}

impl ImageStreamDescriptor {
    /// Filter chain as a comma-separated list, empty if unfiltered
    pub fn filter_display(&self) -> String {
        self.filter_chain.join(", ")
    }
}

/// Whether a stream is an image XObject (`/Subtype /Image`)
pub fn is_image_xobject(stream: &Stream) -> bool {
    matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Image")
}

/// Resolve an XObject entry and describe it if it is an image.
///
/// Dangling references, non-stream targets and non-image XObjects
/// all give `None`.
pub fn classify<M: DocumentModel + ?Sized>(
    model: &M,
    entry: &XObjectEntry,
) -> Option<ImageStreamDescriptor> {
    let stream = match model.dereference_stream(entry.reference) {
        Ok(stream) => stream,
        Err(e) => {
            log::debug!("Skipping XObject /{}: {}", entry.name, e);
            return None;
        }
    };

    if !is_image_xobject(stream) {
        log::debug!("Skipping XObject /{} ({}): not an image", entry.name, entry.reference);
        return None;
    }

    Some(extract(stream))
}

/// Read image metadata from a stream. Missing fields stay unset.
pub fn extract(stream: &Stream) -> ImageStreamDescriptor {
    let dict = &stream.dict;

    ImageStreamDescriptor {
        width: int_entry(dict, b"Width"),
        height: int_entry(dict, b"Height"),
        color_space: color_space_name(dict),
        bits_per_component: int_entry(dict, b"BitsPerComponent"),
        filter_chain: filter_chain(dict),
        raw_byte_length: stream.content.len(),
    }
}

fn int_entry(dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match dict.get(key) {
        Ok(Object::Integer(n)) => Some(*n),
        _ => None,
    }
}

fn name_string(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_string()
}

/// `/ColorSpace` as a name, or the leading name of a colorspace array.
/// References and named colorspace resources are not resolved.
fn color_space_name(dict: &Dictionary) -> Option<String> {
    match dict.get(b"ColorSpace") {
        Ok(Object::Name(name)) => Some(name_string(name)),
        Ok(Object::Array(arr)) => match arr.first() {
            Some(Object::Name(name)) => Some(name_string(name)),
            _ => None,
        },
        _ => None,
    }
}

/// `/Filter` as a single name or an array of names
fn filter_chain(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name_string(name)],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|f| match f {
                Object::Name(name) => Some(name_string(name)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
