//! Record data folders
//!
//! A digitized record lives under `<data_dir>/<pi>/` with one folder per
//! content type: page images in `media/`, prerendered page PDFs in `pdf/`,
//! OCR output in `alto/`. Division-scoped derivatives select the images
//! whose file names carry the division id as a `<div>_` prefix.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions treated as page images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// Errors resolving a record's data folders
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Record '{0}' has no data folder")]
    NotFound(String),

    #[error("Record '{pi}' has no page images for division '{div}'")]
    EmptyDivision { pi: String, div: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolved data folders of one record
#[derive(Debug, Clone)]
pub struct Dataset {
    pub pi: String,
    pub media_dir: PathBuf,
    pub pdf_dir: PathBuf,
    pub alto_dir: PathBuf,
}

impl Dataset {
    /// Resolve the data folders for a record, requiring the media folder
    /// to exist
    pub fn resolve(data_dir: &Path, pi: &str) -> Result<Self, DatasetError> {
        let record_dir = data_dir.join(pi);
        let media_dir = record_dir.join("media");

        if !media_dir.is_dir() {
            return Err(DatasetError::NotFound(pi.to_string()));
        }

        Ok(Self {
            pi: pi.to_string(),
            media_dir,
            pdf_dir: record_dir.join("pdf"),
            alto_dir: record_dir.join("alto"),
        })
    }

    /// Page images of the whole record, sorted by file name
    pub fn page_images(&self) -> Result<Vec<PathBuf>, DatasetError> {
        list_by_extension(&self.media_dir, IMAGE_EXTENSIONS)
    }

    /// Page images belonging to one logical division (file name prefix
    /// `<div>_`). Errors when the division has no pages.
    pub fn division_images(&self, div: &str) -> Result<Vec<PathBuf>, DatasetError> {
        let prefix = format!("{div}_");
        let images: Vec<PathBuf> = self
            .page_images()?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();

        if images.is_empty() {
            return Err(DatasetError::EmptyDivision {
                pi: self.pi.clone(),
                div: div.to_string(),
            });
        }

        Ok(images)
    }

    /// Prerendered page PDFs, sorted by file name
    pub fn page_pdfs(&self) -> Result<Vec<PathBuf>, DatasetError> {
        if !self.pdf_dir.is_dir() {
            return Ok(Vec::new());
        }
        list_by_extension(&self.pdf_dir, &["pdf"])
    }
}

fn list_by_extension(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, DatasetError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| extensions.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record_fixture(pages: &[&str]) -> (tempfile::TempDir, Dataset) {
        let tmp = tempfile::tempdir().unwrap();
        let media = tmp.path().join("PPN1").join("media");
        fs::create_dir_all(&media).unwrap();
        for page in pages {
            fs::write(media.join(page), b"not really an image").unwrap();
        }
        let dataset = Dataset::resolve(tmp.path(), "PPN1").unwrap();
        (tmp, dataset)
    }

    #[test]
    fn resolve_fails_without_media_folder() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Dataset::resolve(tmp.path(), "MISSING"),
            Err(DatasetError::NotFound(_))
        ));
    }

    #[test]
    fn page_images_are_sorted_and_filtered() {
        let (_tmp, dataset) = record_fixture(&["00000002.png", "00000001.jpg", "notes.txt"]);
        let images = dataset.page_images().unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["00000001.jpg", "00000002.png"]);
    }

    #[test]
    fn division_images_select_by_prefix() {
        let (_tmp, dataset) =
            record_fixture(&["LOG_0001_001.png", "LOG_0001_002.png", "LOG_0002_001.png"]);
        let images = dataset.division_images("LOG_0001").unwrap();
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn empty_division_is_an_error() {
        let (_tmp, dataset) = record_fixture(&["LOG_0001_001.png"]);
        assert!(matches!(
            dataset.division_images("LOG_9999"),
            Err(DatasetError::EmptyDivision { .. })
        ));
    }

    #[test]
    fn page_pdfs_empty_without_pdf_folder() {
        let (_tmp, dataset) = record_fixture(&["00000001.png"]);
        assert!(dataset.page_pdfs().unwrap().is_empty());
    }
}
