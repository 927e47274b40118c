//! Paginated export via genpdf. Remote image references cannot be embedded
//! directly, so image locators are resolved through the media store to local
//! bytes, rescaled to fit the printable width, flattened over white and staged
//! as temporary PNG files that stay alive until rendering finishes.

use genpdf::elements::{Break, Image as PdfImage, Paragraph};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use image::imageops::FilterType;
use image::{load_from_memory, DynamicImage, GenericImageView};
use log::warn;
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use tempfile::NamedTempFile;

use crate::media::ObjectStore;

use super::{DocumentModel, RenderError};

const PAGE_WIDTH_INCH: f64 = 8.5;
const MARGIN_MM: f64 = 10.0;
const IMAGE_DPI: f64 = 150.0;

/// Load the font family: prefer Arial if its TTFs were added to ./fonts,
/// otherwise fall back to LiberationSans in the same directory.
fn load_font() -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, RenderError> {
    if let Ok(family) = genpdf::fonts::from_files("./fonts", "Arial", None) {
        return Ok(family);
    }
    genpdf::fonts::from_files("./fonts", "LiberationSans", None).map_err(RenderError::Pdf)
}

fn configure_document(title: &str) -> Result<Document, RenderError> {
    let font_family = load_font()?;
    let mut doc = Document::new(font_family);
    doc.set_title(title);
    doc.set_font_size(10);
    doc.set_line_spacing(1.0);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

/// Rescales the image to fit the printable width, flattens any alpha channel
/// over white, writes a temporary PNG and pushes it into the document. The
/// temp file must outlive rendering, so ownership moves to `temp_files`.
fn push_image(
    doc: &mut Document,
    bytes: &[u8],
    temp_files: &mut Vec<NamedTempFile>,
) -> Result<(), RenderError> {
    let margin_in = MARGIN_MM / 25.4_f64;
    let content_width_px = (PAGE_WIDTH_INCH - 2.0 * margin_in) * IMAGE_DPI;

    let img = load_from_memory(bytes)?;
    let (orig_w, orig_h) = img.dimensions();
    let scale = (content_width_px / orig_w as f64).min(1.0);
    let resized: DynamicImage = if scale >= 1.0 {
        img
    } else {
        let new_w = ((orig_w as f64) * scale).max(1.0).round() as u32;
        let new_h = ((orig_h as f64) * scale).max(1.0).round() as u32;
        img.resize(new_w, new_h, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut background = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &rgba, 0, 0);
    let raw = DynamicImage::ImageRgba8(background).to_rgb8().into_raw();

    let mut tmp = NamedTempFile::new()?;
    {
        let file = tmp.as_file_mut();
        let mut encoder = PngEncoder::new(file, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raw)?;
    }

    let mut element = PdfImage::from_path(tmp.path())?;
    element.set_dpi(IMAGE_DPI);
    temp_files.push(tmp);
    doc.push(element);
    Ok(())
}

fn heading(text: &str, size: u8) -> Paragraph {
    let mut p = Paragraph::new("");
    p.push(StyledString::new(
        text.to_string(),
        Style::new().bold().with_font_size(size),
    ));
    p
}

/// Renders the document model to PDF bytes. Rendering to memory keeps
/// concurrent requests for the same record independent of each other.
pub fn render_pdf(model: &DocumentModel, media: &dyn ObjectStore) -> Result<Vec<u8>, RenderError> {
    let mut doc = configure_document(&model.title)?;
    let mut temp_files: Vec<NamedTempFile> = Vec::new();

    doc.push(heading(&model.title, 16));
    if !model.subtitle.is_empty() {
        doc.push(Paragraph::new(model.subtitle.clone()));
    }

    for section in &model.sections {
        doc.push(Break::new(1));
        doc.push(heading(&section.heading, 13));
        for field in &section.fields {
            let mut p = Paragraph::new("");
            p.push(StyledString::new(
                format!("{}: ", field.label),
                Style::new().bold(),
            ));
            p.push(StyledString::new(field.value.clone(), Style::new()));
            doc.push(p);
        }
        for url in &section.images {
            match media.local_path(url) {
                Some(path) => {
                    let bytes = std::fs::read(&path)?;
                    push_image(&mut doc, &bytes, &mut temp_files)?;
                }
                None => {
                    // Remote or unresolved locator: reference it instead.
                    warn!("cannot stage image for embedding: {url}");
                    doc.push(Paragraph::new(format!("[image: {url}]")));
                }
            }
        }
    }

    let mut out = Vec::new();
    doc.render(&mut out)?;
    // temp_files dropped and cleaned up here
    Ok(out)
}
