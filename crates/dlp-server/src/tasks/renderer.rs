//! PDF rendering
//!
//! Composes PDFs from page images: one page per image, sized to the image
//! dimensions at 72 dpi. Output is written to a `.part` file and renamed
//! into place so readers never observe a half-written derivative.

use lopdf::content::Content;
use lopdf::{dictionary, Document, Object};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while rendering a PDF
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No page images to render")]
    NoPages,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Render one PDF with one page per input image
pub fn render_pdf(images: &[PathBuf], out: &Path) -> Result<(), RenderError> {
    if images.is_empty() {
        return Err(RenderError::NoPages);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(images.len());

    for image_path in images {
        let (width, height) = image::image_dimensions(image_path)?;
        let (width, height) = (width as f32, height as f32);

        let content = Content { operations: vec![] };
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => Object::Reference(content_id),
        });

        let xobject = lopdf::xobject::image(image_path)?;
        doc.insert_image(page_id, xobject, (0.0, 0.0), (width, height))?;

        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    write_atomically(&mut doc, out)
}

/// Render a single-page PDF for one page image
pub fn render_page_pdf(image: &Path, out: &Path) -> Result<(), RenderError> {
    render_pdf(&[image.to_path_buf()], out)
}

fn write_atomically(doc: &mut Document, out: &Path) -> Result<(), RenderError> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let part = out.with_extension("pdf.part");
    doc.save(&part)?;
    std::fs::rename(&part, out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_test_image(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(4, 4, image::Rgb([200u8, 10, 10]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn renders_one_page_per_image() {
        let tmp = tempfile::tempdir().unwrap();
        let images = vec![
            write_test_image(tmp.path(), "00000001.png"),
            write_test_image(tmp.path(), "00000002.png"),
        ];
        let out = tmp.path().join("out.pdf");

        render_pdf(&images, &out).unwrap();

        let bytes = fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        // no stray partial file left behind
        assert!(!tmp.path().join("out.pdf.part").exists());
    }

    #[test]
    fn single_page_render() {
        let tmp = tempfile::tempdir().unwrap();
        let img = write_test_image(tmp.path(), "page.png");
        let out = tmp.path().join("page.pdf");

        render_page_pdf(&img, &out).unwrap();
        assert!(out.is_file());
    }

    #[test]
    fn empty_input_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out.pdf");
        assert!(matches!(render_pdf(&[], &out), Err(RenderError::NoPages)));
    }

    #[test]
    fn output_directory_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let img = write_test_image(tmp.path(), "page.png");
        let out = tmp.path().join("nested").join("dir").join("out.pdf");

        render_page_pdf(&img, &out).unwrap();
        assert!(out.is_file());
    }
}
