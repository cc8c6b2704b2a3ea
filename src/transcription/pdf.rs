use crate::error::{MinutesError, Result};
use lopdf::Document;
use std::path::Path;

/// Text of every page in order, one `\n` between pages. Pages whose text
/// cannot be decoded contribute an empty string.
pub fn extract_text(path: &Path) -> Result<String> {
    let doc = Document::load(path).map_err(|e| {
        MinutesError::Extraction(format!("Failed to open PDF {}: {}", path.display(), e))
    })?;

    let pages: Vec<u32> = doc.get_pages().into_keys().collect();
    let mut parts = Vec::with_capacity(pages.len());

    for page in &pages {
        match doc.extract_text(&[*page]) {
            Ok(text) => parts.push(text),
            Err(e) => {
                tracing::warn!("No text extracted from page {}: {}", page, e);
                parts.push(String::new());
            }
        }
    }

    tracing::debug!("Extracted {} pages from {}", pages.len(), path.display());
    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use tempfile::tempdir;

    fn write_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_pages_joined_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("minutes.pdf");
        write_pdf(&path, &["Alice: ship on Friday", "Bob: agreed"]);

        let text = extract_text(&path).unwrap();
        let alice = text.find("Alice: ship on Friday").unwrap();
        let bob = text.find("Bob: agreed").unwrap();
        assert!(alice < bob);
        assert!(text[alice..bob].contains('\n'));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = extract_text(&dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, MinutesError::Extraction(_)));
    }
}
