//! Screen capture via xcap

use image::{DynamicImage, GrayImage};
use xcap::Monitor;

use crate::error::{NavError, Result};
use crate::screen::FrameSource;

/// Grabs the first monitor reported by the OS
#[derive(Debug, Default)]
pub struct PrimaryMonitor;

impl FrameSource for PrimaryMonitor {
    fn capture(&mut self) -> Result<GrayImage> {
        let monitors = Monitor::all().map_err(|e| NavError::Capture(e.to_string()))?;
        let monitor = monitors
            .first()
            .ok_or_else(|| NavError::Capture("no monitor found".to_string()))?;
        let frame = monitor
            .capture_image()
            .map_err(|e| NavError::Capture(e.to_string()))?;
        Ok(DynamicImage::ImageRgba8(frame).to_luma8())
    }
}
