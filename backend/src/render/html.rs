//! Styled-markup export. Locally stored images are inlined as base64 data
//! URIs so the produced document is self-contained; foreign locators are left
//! as plain URLs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tera::{Context, Tera};

use crate::media::ObjectStore;

use super::{DocumentModel, RenderError};

const TEMPLATE: &str = include_str!("report.html.tera");

pub fn render_html(doc: &DocumentModel, media: &dyn ObjectStore) -> Result<String, RenderError> {
    let mut doc = doc.clone();
    for section in &mut doc.sections {
        for image in &mut section.images {
            if let Some(path) = media.local_path(image) {
                let bytes = std::fs::read(&path)?;
                let mime = mime_guess::from_path(&path).first_or_octet_stream();
                *image = format!("data:{};base64,{}", mime, BASE64.encode(bytes));
            }
        }
    }

    let mut tera = Tera::default();
    tera.add_raw_template("report.html", TEMPLATE)?;
    let context = Context::from_serialize(&doc)?;
    Ok(tera.render("report.html", &context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::DiskStore;
    use crate::render::DocSection;
    use tempfile::tempdir;

    #[test]
    fn renders_fields_and_inlines_local_images() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path(), "http://localhost:8080").unwrap();
        let stored = store.put("scene.png", b"not really a png", "image/png").unwrap();

        let doc = DocumentModel {
            title: "Accident Report".to_string(),
            subtitle: "Record 42".to_string(),
            sections: vec![DocSection::new("Accident Summary")
                .field("Case Number", "CAS-1")
                .image(&stored.url)
                .image("https://elsewhere.example/far.png")],
        };
        let html = render_html(&doc, &store).unwrap();

        assert!(html.contains("<strong>Case Number:</strong> CAS-1"));
        assert!(html.contains("data:image/png;base64,"));
        // Foreign locators stay as-is.
        assert!(html.contains("https://elsewhere.example/far.png"));
    }
}
