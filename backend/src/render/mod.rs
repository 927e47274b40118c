//! Report rendering. Every kind is first flattened into a kind-agnostic
//! `DocumentModel` (title, sections of label/value fields plus image
//! locators); the HTML and PDF renderers then share that one shape. Absent
//! values always render as the explicit `N/A` placeholder, never omitted.

pub mod html;
mod model;
pub mod pdf;

use common::model::report::NOT_AVAILABLE;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("pdf error: {0}")]
    Pdf(#[from] genpdf::error::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("png encoding error: {0}")]
    Png(#[from] png::EncodingError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, Serialize)]
pub struct DocField {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct DocSection {
    pub heading: String,
    pub fields: Vec<DocField>,
    /// Media locator URLs to be embedded after the fields.
    pub images: Vec<String>,
}

impl DocSection {
    pub fn new(heading: impl Into<String>) -> Self {
        DocSection {
            heading: heading.into(),
            fields: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn field(mut self, label: &str, value: impl AsRef<str>) -> Self {
        let value = value.as_ref().trim();
        self.fields.push(DocField {
            label: label.to_string(),
            value: if value.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                value.to_string()
            },
        });
        self
    }

    pub fn field_opt(self, label: &str, value: &Option<String>) -> Self {
        match value {
            Some(v) => self.field(label, v),
            None => self.field(label, ""),
        }
    }

    pub fn image(mut self, url: &str) -> Self {
        self.images.push(url.to_string());
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DocumentModel {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<DocSection>,
}

/// Builds the printable document for one record.
pub trait Printable {
    fn document(&self) -> DocumentModel;
}
