use std::fmt;

/// A group of file formats served by one extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    Pdf,
    Word,
    Spreadsheet,
    Presentation,
    Html,
    Image,
    PlainText,
}

impl FormatFamily {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match normalize_mime(mime).as_str() {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/msword" => Some(Self::Word),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel"
            | "application/vnd.ms-excel.sheet.macroenabled.12"
            | "application/vnd.oasis.opendocument.spreadsheet"
            | "text/csv"
            | "application/csv"
            | "text/tab-separated-values" => Some(Self::Spreadsheet),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            | "application/vnd.ms-powerpoint" => Some(Self::Presentation),
            "text/html" | "application/xhtml+xml" => Some(Self::Html),
            "image/png" | "image/jpeg" | "image/jpg" | "image/webp" | "image/gif"
            | "image/tiff" | "image/bmp" => Some(Self::Image),
            "text/plain" | "text/markdown" | "text/x-markdown" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Word),
            "xlsx" | "xlsm" | "xls" | "ods" | "csv" | "tsv" => Some(Self::Spreadsheet),
            "pptx" | "ppt" => Some(Self::Presentation),
            "html" | "htm" | "xhtml" => Some(Self::Html),
            "png" | "jpg" | "jpeg" | "webp" | "gif" | "tif" | "tiff" | "bmp" => Some(Self::Image),
            "txt" | "md" | "markdown" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Resolves a family from the declared MIME type, falling back to the
    /// file extension when the MIME type is generic or unknown. `text/plain`
    /// yields to any recognized extension.
    pub fn resolve(file_name: &str, mime: &str) -> Option<Self> {
        let by_extension = file_extension(file_name).and_then(Self::from_extension);

        match Self::from_mime(mime) {
            Some(Self::PlainText) if by_extension.is_some() => by_extension,
            Some(family) => Some(family),
            None => by_extension,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatFamily::Pdf => "pdf",
            FormatFamily::Word => "word",
            FormatFamily::Spreadsheet => "spreadsheet",
            FormatFamily::Presentation => "presentation",
            FormatFamily::Html => "html",
            FormatFamily::Image => "image",
            FormatFamily::PlainText => "plain_text",
        }
    }
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cases a MIME type and drops parameters such as `; charset=utf-8`.
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn file_extension(file_name: &str) -> Option<&str> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension)
}
