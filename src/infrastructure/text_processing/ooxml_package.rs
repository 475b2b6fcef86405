use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::application::ports::ExtractionError;
use crate::domain::{FormatFamily, Metadata};

pub type Package = ZipArchive<Cursor<Vec<u8>>>;

pub fn open_package(data: Vec<u8>, format: FormatFamily) -> Result<Package, ExtractionError> {
    ZipArchive::new(Cursor::new(data)).map_err(|e| {
        ExtractionError::malformed(format, format!("not an Office Open XML package: {e}"))
    })
}

/// Reads a package part as UTF-8. Returns `None` when the part does not exist.
pub fn read_part(
    package: &mut Package,
    name: &str,
    format: FormatFamily,
) -> Result<Option<String>, ExtractionError> {
    let mut part = match package.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(ExtractionError::malformed(
                format,
                format!("cannot open {name}: {e}"),
            ));
        }
    };

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractionError::malformed(format, format!("cannot read {name}: {e}")))?;
    Ok(Some(xml))
}

/// Title and author from `docProps/core.xml`, when present.
pub fn core_properties(package: &mut Package, format: FormatFamily) -> Metadata {
    let mut metadata = Metadata::new();
    let xml = match read_part(package, "docProps/core.xml", format) {
        Ok(Some(xml)) => xml,
        Ok(None) => return metadata,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable core properties");
            return metadata;
        }
    };

    let mut reader = Reader::from_str(&xml);
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"title" => Some("title"),
                    b"creator" => Some("author"),
                    b"subject" => Some("subject"),
                    _ => None,
                };
            }
            Ok(Event::Text(e)) => {
                if let (Some(key), Ok(text)) = (current, e.unescape()) {
                    let text = text.trim();
                    if !text.is_empty() {
                        metadata.insert(key.to_string(), text.to_string().into());
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    metadata
}

pub fn attribute_value(element: &quick_xml::events::BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}
