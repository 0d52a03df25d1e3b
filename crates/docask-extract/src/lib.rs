//! # DocAsk Extract
//!
//! PDF text extraction. Pages are extracted in order and each page's text is
//! followed by a newline, so a two-page document with texts "A " and "B "
//! stores as "A \nB \n". Encrypted PDFs are rejected with a dedicated error
//! kind; every other parse failure is a generic processing error.

use docask_core::error::{DocaskError, Result};

/// Extract the full text of a PDF, page by page.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| DocaskError::Processing(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(DocaskError::Extraction(
            "PDF decryption support is required for encrypted documents.".into(),
        ));
    }

    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    tracing::debug!("Extracting text from {} page(s)", pages.len());

    let page_texts = pages
        .iter()
        .map(|page| doc.extract_text(&[*page]))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| DocaskError::Processing(e.to_string()))?;

    Ok(join_pages(page_texts))
}

/// Concatenate per-page texts, appending a newline after every page.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }
    text
}
