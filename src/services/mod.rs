mod pdf_extractor;

pub use pdf_extractor::{extract_text, truncate_chars, PdfExtractor};
