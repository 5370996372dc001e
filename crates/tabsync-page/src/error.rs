//! Error types for page parsing.

/// Error while parsing a page into a [`Document`](crate::Document).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PageError {
    /// XML parsing error.
    #[error("XML parse error")]
    XmlParse(#[from] quick_xml::Error),

    /// Encoding error while decoding names, text or attributes.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}
