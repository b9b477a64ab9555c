//! Thumbnail and medium variants for a directory of photos.
//!
//! ```text
//! photos/                     photos/
//! ├── a.jpg         ──►       ├── a.jpg
//! └── b.JPG                   ├── b.JPG
//!                             ├── thumbs/   a.jpg  b.JPG   (fit 200x200)
//!                             └── medium/   a.jpg  b.JPG   (fit 1200x1200)
//! ```
//!
//! Variants keep the source filename. An image whose variants both exist is
//! skipped; otherwise only the missing ones are written. A failure on either
//! variant counts the image as failed and the run moves on to the next one.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_within;
use super::params::{Quality, ResizeParams};
use crate::scan::{self, RESIZE_EXTENSIONS, ScanError};
use crate::settings::ResizeSettings;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

pub const THUMBS_DIR: &str = "thumbs";
pub const MEDIUM_DIR: &str = "medium";

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeConfig {
    pub thumb_size: u32,
    pub medium_size: u32,
    pub quality: Quality,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        (&ResizeSettings::default()).into()
    }
}

impl From<&ResizeSettings> for ResizeConfig {
    fn from(settings: &ResizeSettings) -> Self {
        Self {
            thumb_size: settings.thumb_size,
            medium_size: settings.medium_size,
            quality: Quality::new(settings.quality),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Thumb,
    Medium,
}

impl VariantKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            VariantKind::Thumb => THUMBS_DIR,
            VariantKind::Medium => MEDIUM_DIR,
        }
    }

    fn max_edge(self, config: &ResizeConfig) -> u32 {
        match self {
            VariantKind::Thumb => config.thumb_size,
            VariantKind::Medium => config.medium_size,
        }
    }
}

/// Progress events, one stream per run.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeEvent {
    /// `index` is 1-based.
    Started {
        index: usize,
        total: usize,
        filename: String,
    },
    Skipped {
        filename: String,
    },
    VariantCreated {
        filename: String,
        kind: VariantKind,
        width: u32,
        height: u32,
    },
    Failed {
        filename: String,
        error: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

/// Create missing variants for every JPEG directly inside `dir`.
///
/// Returns `Err` only when the directory itself can't be listed or the
/// variant directories can't be created. Per-image problems are counted in
/// [`ResizeSummary::failed`].
pub fn resize_directory(
    backend: &impl ImageBackend,
    dir: &Path,
    config: &ResizeConfig,
    progress: Option<Sender<ResizeEvent>>,
) -> Result<ResizeSummary, ResizeError> {
    let images = scan::list_files_with_extensions(dir, RESIZE_EXTENSIONS)?;
    std::fs::create_dir_all(dir.join(THUMBS_DIR))?;
    std::fs::create_dir_all(dir.join(MEDIUM_DIR))?;

    let emit = |event: ResizeEvent| {
        if let Some(tx) = &progress {
            // Receiver gone means nobody is listening; keep working.
            let _ = tx.send(event);
        }
    };

    let mut summary = ResizeSummary {
        total: images.len(),
        ..Default::default()
    };

    for (i, filename) in images.iter().enumerate() {
        emit(ResizeEvent::Started {
            index: i + 1,
            total: images.len(),
            filename: filename.clone(),
        });

        let missing: Vec<VariantKind> = [VariantKind::Thumb, VariantKind::Medium]
            .into_iter()
            .filter(|kind| !dir.join(kind.dir_name()).join(filename).exists())
            .collect();

        if missing.is_empty() {
            summary.skipped += 1;
            emit(ResizeEvent::Skipped {
                filename: filename.clone(),
            });
            continue;
        }

        match create_variants(backend, dir, filename, &missing, config, &emit) {
            Ok(()) => summary.processed += 1,
            Err(e) => {
                summary.failed += 1;
                emit(ResizeEvent::Failed {
                    filename: filename.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

fn create_variants(
    backend: &impl ImageBackend,
    dir: &Path,
    filename: &str,
    kinds: &[VariantKind],
    config: &ResizeConfig,
    emit: &impl Fn(ResizeEvent),
) -> Result<(), BackendError> {
    let source = dir.join(filename);
    let dims = backend.identify(&source)?;

    for &kind in kinds {
        let (width, height) = fit_within((dims.width, dims.height), kind.max_edge(config));
        backend.resize(&ResizeParams {
            source: source.clone(),
            output: dir.join(kind.dir_name()).join(filename),
            width,
            height,
            quality: config.quality,
        })?;
        emit(ResizeEvent::VariantCreated {
            filename: filename.to_string(),
            kind,
            width,
            height,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::touch_images;
    use tempfile::TempDir;

    fn resize_ops(backend: &MockBackend) -> Vec<RecordedOp> {
        backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Resize { .. }))
            .collect()
    }

    #[test]
    fn creates_both_variants() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["a.jpg"]);
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 4000,
            height: 3000,
        }]);

        let summary =
            resize_directory(&backend, tmp.path(), &ResizeConfig::default(), None).unwrap();

        assert_eq!(
            summary,
            ResizeSummary {
                processed: 1,
                skipped: 0,
                failed: 0,
                total: 1
            }
        );
        let ops = resize_ops(&backend);
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize { output, width: 200, height: 150, quality: 80, .. }
                if output.ends_with("thumbs/a.jpg")
        ));
        assert!(matches!(
            &ops[1],
            RecordedOp::Resize { output, width: 1200, height: 900, .. }
                if output.ends_with("medium/a.jpg")
        ));
    }

    #[test]
    fn skips_when_both_variants_exist() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["a.jpg"]);
        touch_images(&tmp.path().join("thumbs"), &["a.jpg"]);
        touch_images(&tmp.path().join("medium"), &["a.jpg"]);
        let backend = MockBackend::new();

        let summary =
            resize_directory(&backend, tmp.path(), &ResizeConfig::default(), None).unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.processed, 0);
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn only_missing_variant_is_created() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["a.jpg"]);
        touch_images(&tmp.path().join("thumbs"), &["a.jpg"]);
        let backend = MockBackend::new();

        let summary =
            resize_directory(&backend, tmp.path(), &ResizeConfig::default(), None).unwrap();

        assert_eq!(summary.processed, 1);
        let ops = resize_ops(&backend);
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Resize { output, .. } if output.ends_with("medium/a.jpg")));
    }

    #[test]
    fn small_source_is_not_upscaled() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["small.jpg"]);
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 640,
            height: 480,
        }]);

        resize_directory(&backend, tmp.path(), &ResizeConfig::default(), None).unwrap();

        let ops = resize_ops(&backend);
        assert!(matches!(&ops[1], RecordedOp::Resize { width: 640, height: 480, .. }));
    }

    #[test]
    fn failure_counts_and_continues() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["a.jpg", "bad.jpg", "c.jpg"]);
        let backend = MockBackend::failing_on(&["bad.jpg"]);

        let summary =
            resize_directory(&backend, tmp.path(), &ResizeConfig::default(), None).unwrap();

        assert_eq!(
            summary,
            ResizeSummary {
                processed: 2,
                skipped: 0,
                failed: 1,
                total: 3
            }
        );
        assert!(tmp.path().join("medium/c.jpg").exists());
        assert!(!tmp.path().join("thumbs/bad.jpg").exists());
    }

    #[test]
    fn only_jpegs_are_resized() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["a.JPEG", "b.png", "c.gif", "d.JPG"]);
        let backend = MockBackend::new();

        let summary =
            resize_directory(&backend, tmp.path(), &ResizeConfig::default(), None).unwrap();
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn creates_variant_directories_even_when_empty() {
        let tmp = TempDir::new().unwrap();
        let summary =
            resize_directory(&MockBackend::new(), tmp.path(), &ResizeConfig::default(), None)
                .unwrap();

        assert_eq!(summary, ResizeSummary::default());
        assert!(tmp.path().join("thumbs").is_dir());
        assert!(tmp.path().join("medium").is_dir());
    }

    #[test]
    fn second_run_skips_everything() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["a.jpg", "b.jpg"]);
        let backend = MockBackend::new();
        let config = ResizeConfig::default();

        resize_directory(&backend, tmp.path(), &config, None).unwrap();
        let again = resize_directory(&backend, tmp.path(), &config, None).unwrap();

        assert_eq!(again.skipped, 2);
        assert_eq!(again.processed, 0);
    }

    #[test]
    fn events_are_sent_in_order() {
        let tmp = TempDir::new().unwrap();
        touch_images(tmp.path(), &["a.jpg"]);
        touch_images(&tmp.path().join("thumbs"), &["a.jpg"]);
        let (tx, rx) = std::sync::mpsc::channel();

        resize_directory(
            &MockBackend::new(),
            tmp.path(),
            &ResizeConfig::default(),
            Some(tx),
        )
        .unwrap();

        let events: Vec<ResizeEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                ResizeEvent::Started {
                    index: 1,
                    total: 1,
                    filename: "a.jpg".into()
                },
                ResizeEvent::VariantCreated {
                    filename: "a.jpg".into(),
                    kind: VariantKind::Medium,
                    width: 1200,
                    height: 900
                },
            ]
        );
    }

    #[test]
    fn config_from_settings() {
        let settings = ResizeSettings {
            thumb_size: 300,
            medium_size: 1600,
            quality: 250,
        };
        let config = ResizeConfig::from(&settings);
        assert_eq!(config.thumb_size, 300);
        assert_eq!(config.quality.value(), 100);
    }
}
