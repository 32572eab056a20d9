use log::{debug, warn};
use lopdf::Document;

use crate::error::ExtractError;

/// Extracts the plain text of a PDF, page by page.
///
/// Pages are read in order and concatenated. A page that fails to yield
/// text is skipped rather than failing the whole document.
///
/// # Errors
/// Returns an error if:
/// - The bytes are not a readable PDF
/// - No page yields any text
pub fn extract_text(pdf_data: &[u8]) -> Result<String, ExtractError> {
    let document = Document::load_mem(pdf_data)?;
    let pages = document.get_pages();
    debug!("PDF has {} pages", pages.len());

    let mut text = String::new();
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => warn!("Skipping PDF page {}: {}", page_number, e),
        }
    }

    if text.trim().is_empty() {
        return Err(ExtractError::NoTextFound);
    }

    Ok(text)
}

/// Runs [`extract_text`] on the blocking pool so large documents don't stall the runtime
pub async fn extract_text_blocking(pdf_data: Vec<u8>) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(&pdf_data))
        .await
        .map_err(|e| ExtractError::Worker(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one page per entry; `None` produces a page without text.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let pdf = build_pdf(&[Some("Tomato Soup"), Some("Simmer for twenty minutes")]);
        let text = extract_text(&pdf).unwrap();

        let first = text.find("Tomato Soup").unwrap();
        let second = text.find("Simmer for twenty minutes").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_pages_without_text_are_skipped() {
        let pdf = build_pdf(&[None, Some("Pancakes")]);
        let text = extract_text(&pdf).unwrap();
        assert!(text.contains("Pancakes"));
    }

    #[test]
    fn test_document_without_text_fails() {
        let pdf = build_pdf(&[None, None]);
        assert!(matches!(extract_text(&pdf), Err(ExtractError::NoTextFound)));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = extract_text(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::InvalidPdf(_))));
    }

    #[tokio::test]
    async fn test_blocking_extraction() {
        let pdf = build_pdf(&[Some("Flatbread")]);
        let text = extract_text_blocking(pdf).await.unwrap();
        assert!(text.contains("Flatbread"));
    }
}
