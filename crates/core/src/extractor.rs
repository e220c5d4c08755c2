use crate::error::IngestError;
use lopdf::Document;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based position of the page in the document.
    pub number: u32,
    pub text: String,
}

impl PageText {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Turns uploaded bytes into per-page plain text, one entry per page in
/// reading order. Blank pages are returned too; callers decide to skip them.
pub trait PdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, IngestError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, IngestError> {
        let document =
            Document::load_mem(bytes).map_err(|error| IngestError::Extraction(error.to_string()))?;

        let mut pages = Vec::new();
        for (index, (page_no, _page_id)) in document.get_pages().into_iter().enumerate() {
            let text = document.extract_text(&[page_no]).map_err(|error| {
                IngestError::Extraction(format!("page {}: {error}", index + 1))
            })?;

            pages.push(PageText {
                number: index as u32 + 1,
                text,
            });
        }

        Ok(pages)
    }
}

pub fn extract_page_texts(bytes: &[u8]) -> Result<Vec<PageText>, IngestError> {
    LopdfExtractor.extract_pages(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_that_are_not_a_pdf_fail_extraction() {
        let result = extract_page_texts(b"This is not a PDF");
        assert!(matches!(result, Err(IngestError::Extraction(_))));
    }

    #[test]
    fn truncated_pdf_fails_extraction() {
        let result = extract_page_texts(b"%PDF-1.4\n%broken");
        assert!(matches!(result, Err(IngestError::Extraction(_))));
    }

    #[test]
    fn whitespace_only_page_is_blank() {
        let page = PageText {
            number: 2,
            text: " \n\t".to_string(),
        };
        assert!(page.is_blank());
    }
}
