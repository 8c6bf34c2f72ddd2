//! Template matcher - "is this reference image on screen, and where?"

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::{debug, info};

use super::correlate::best_match;
use super::TemplateId;
use crate::error::{NavError, Result};
use crate::types::ScreenPosition;

/// Outcome of one template lookup. Absence is a normal value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Found(ScreenPosition),
    NotFound,
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found(_))
    }

    pub fn position(&self) -> Option<ScreenPosition> {
        match self {
            MatchResult::Found(pos) => Some(*pos),
            MatchResult::NotFound => None,
        }
    }
}

/// Locates reference templates on the live screen.
///
/// Implementations must return `Ok(MatchResult::NotFound)` for a clean miss and
/// reserve `Err` for faults (missing asset, capture failure).
pub trait TemplateMatcher {
    fn locate(&mut self, template: TemplateId, confidence: f32) -> Result<MatchResult>;
}

/// Source of screen frames
pub trait FrameSource {
    fn capture(&mut self) -> Result<GrayImage>;
}

/// Grayscale reference images, loaded once at startup
pub struct TemplateStore {
    images: HashMap<TemplateId, GrayImage>,
}

impl TemplateStore {
    /// Load every known template from `asset_dir`. Any unreadable file is fatal.
    pub fn load(asset_dir: &Path) -> Result<Self> {
        let mut images = HashMap::new();
        for template in TemplateId::ALL {
            let path = asset_dir.join(template.file_name());
            let image = image::open(&path)
                .map_err(|source| NavError::Asset {
                    path: path.clone(),
                    source,
                })?
                .to_luma8();
            debug!(template = ?template, width = image.width(), height = image.height(), "Template loaded");
            images.insert(template, image);
        }
        info!(dir = %asset_dir.display(), count = images.len(), "Templates loaded");
        Ok(Self { images })
    }

    /// Build from in-memory images
    pub fn from_images(images: HashMap<TemplateId, GrayImage>) -> Self {
        Self { images }
    }

    pub fn get(&self, template: TemplateId) -> Option<&GrayImage> {
        self.images.get(&template)
    }
}

/// Matches stored templates against frames from a [`FrameSource`]
pub struct ScreenMatcher<F: FrameSource> {
    frames: F,
    templates: TemplateStore,
    asset_dir: PathBuf,
}

impl<F: FrameSource> ScreenMatcher<F> {
    pub fn new(frames: F, templates: TemplateStore, asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames,
            templates,
            asset_dir: asset_dir.into(),
        }
    }
}

impl<F: FrameSource> TemplateMatcher for ScreenMatcher<F> {
    fn locate(&mut self, template: TemplateId, confidence: f32) -> Result<MatchResult> {
        let Some(needle) = self.templates.get(template) else {
            return Err(NavError::Asset {
                path: self.asset_dir.join(template.file_name()),
                source: image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "template not loaded",
                )),
            });
        };

        let frame = self.frames.capture()?;
        let result = match best_match(&frame, needle) {
            Some(hit) if hit.score >= confidence => MatchResult::Found(ScreenPosition {
                x: hit.x + needle.width() / 2,
                y: hit.y + needle.height() / 2,
            }),
            _ => MatchResult::NotFound,
        };

        debug!(template = ?template, confidence, found = result.is_found(), "locate");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{imageops, Luma};

    struct StillFrame(GrayImage);

    impl FrameSource for StillFrame {
        fn capture(&mut self) -> Result<GrayImage> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCapture;

    impl FrameSource for BrokenCapture {
        fn capture(&mut self) -> Result<GrayImage> {
            Err(NavError::Capture("no monitor".to_string()))
        }
    }

    fn textured(width: u32, height: u32, seed: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729) ^ seed).wrapping_mul(2_654_435_761);
            Luma([(v >> 24) as u8])
        })
    }

    fn matcher_with(frame: GrayImage, template: TemplateId, needle: GrayImage) -> ScreenMatcher<StillFrame> {
        let mut images = HashMap::new();
        images.insert(template, needle);
        ScreenMatcher::new(StillFrame(frame), TemplateStore::from_images(images), "assets")
    }

    #[test]
    fn test_locate_returns_centre() {
        let needle = textured(10, 6, 42);
        let mut frame = textured(80, 50, 7);
        imageops::replace(&mut frame, &needle, 20, 30);

        let mut matcher = matcher_with(frame, TemplateId::EnterKey, needle);
        let result = matcher.locate(TemplateId::EnterKey, 0.9).unwrap();
        assert_eq!(result, MatchResult::Found(ScreenPosition { x: 25, y: 33 }));
    }

    #[test]
    fn test_below_confidence_is_not_found() {
        let frame = textured(80, 50, 7);
        let mut matcher = matcher_with(frame, TemplateId::EnterKey, textured(10, 10, 1234));
        let result = matcher.locate(TemplateId::EnterKey, 0.8).unwrap();
        assert_eq!(result, MatchResult::NotFound);
    }

    #[test]
    fn test_unloaded_template_is_fault() {
        let mut matcher = matcher_with(textured(20, 20, 1), TemplateId::EnterKey, textured(4, 4, 2));
        let err = matcher.locate(TemplateId::OnlineFocused, 0.8).unwrap_err();
        assert!(matches!(err, NavError::Asset { .. }));
    }

    #[test]
    fn test_capture_failure_propagates() {
        let mut images = HashMap::new();
        images.insert(TemplateId::EnterKey, textured(4, 4, 2));
        let mut matcher =
            ScreenMatcher::new(BrokenCapture, TemplateStore::from_images(images), "assets");
        let err = matcher.locate(TemplateId::EnterKey, 0.8).unwrap_err();
        assert!(matches!(err, NavError::Capture(_)));
    }

    #[test]
    fn test_store_load_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemplateStore::load(dir.path()).err().unwrap();
        match err {
            NavError::Asset { path, .. } => {
                assert!(path.ends_with(TemplateId::PushButtonToStart.file_name()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_store_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        for (i, template) in TemplateId::ALL.iter().enumerate() {
            textured(8, 8, i as u32)
                .save(dir.path().join(template.file_name()))
                .unwrap();
        }
        let store = TemplateStore::load(dir.path()).unwrap();
        for template in TemplateId::ALL {
            assert_eq!(store.get(template).unwrap().dimensions(), (8, 8));
        }
    }
}
