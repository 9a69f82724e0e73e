//! Page eyedropper: sample one pixel of a captured viewport image.
//!
//! The capture itself (a screenshot round-trip through the extension) is
//! behind [`CaptureService`]. This module only maps a CSS-pixel point to a
//! raster pixel using the device pixel ratio and reads its color. There is
//! no timeout on the capture; a pick either resolves or is cancelled.

use glam::DVec2;
use tracing::{debug, warn};

use crate::color::Rgb;
use crate::error::PickerError;

/// An RGBA8 raster, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Wraps a raw RGBA buffer.
    ///
    /// Returns `PickerError::InvalidDimensions` if either dimension is zero
    /// or the buffer length is not `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PickerError> {
        if width == 0 || height == 0 {
            return Err(PickerError::InvalidDimensions);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(PickerError::InvalidDimensions)?;
        if pixels.len() != expected {
            return Err(PickerError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wraps a decoded image.
    #[cfg(feature = "png")]
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, PickerError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of the raster pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(offset..offset + 3)?;
        Some(Rgb::new(px[0], px[1], px[2]))
    }

    /// Color under a viewport point given in CSS pixels.
    ///
    /// The point is scaled by `device_pixel_ratio` (non-positive or
    /// non-finite ratios count as 1) and floored to a raster pixel.
    pub fn sample(&self, point: DVec2, device_pixel_ratio: f64) -> Option<Rgb> {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let raster = (point * ratio).floor();
        if !raster.is_finite() || raster.x < 0.0 || raster.y < 0.0 {
            return None;
        }
        if raster.x >= self.width as f64 || raster.y >= self.height as f64 {
            return None;
        }
        self.pixel(raster.x as u32, raster.y as u32)
    }

    /// [`Frame::sample`] formatted as `"#rrggbb"`.
    pub fn sample_hex(&self, point: DVec2, device_pixel_ratio: f64) -> Option<String> {
        self.sample(point, device_pixel_ratio).map(Rgb::to_hex)
    }
}

/// Produces a full-viewport screenshot.
pub trait CaptureService {
    fn capture(&self) -> Result<Frame, PickerError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EyedropperState {
    #[default]
    Idle,
    Picking,
}

/// One eyedropper session: started by the picker button, finished by a
/// click on the page or cancelled with Escape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eyedropper {
    state: EyedropperState,
}

impl Eyedropper {
    pub fn state(&self) -> EyedropperState {
        self.state
    }

    pub fn is_picking(&self) -> bool {
        self.state == EyedropperState::Picking
    }

    pub fn start(&mut self) {
        debug!("eyedropper started");
        self.state = EyedropperState::Picking;
    }

    /// Abandons the pick. Returns whether one was in progress.
    pub fn cancel(&mut self) -> bool {
        let was = self.is_picking();
        if was {
            debug!("eyedropper cancelled");
        }
        self.state = EyedropperState::Idle;
        was
    }

    /// Finishes the pick at `point` (CSS pixels, viewport-relative).
    ///
    /// Returns `None` when no pick is in progress, the capture fails, or
    /// the point is off the captured image. The session ends either way.
    pub fn pick(
        &mut self,
        service: &dyn CaptureService,
        point: DVec2,
        device_pixel_ratio: f64,
    ) -> Option<String> {
        if !self.is_picking() {
            return None;
        }
        self.state = EyedropperState::Idle;
        match service.capture() {
            Ok(frame) => frame.sample_hex(point, device_pixel_ratio),
            Err(e) => {
                warn!(error = %e, "eyedropper capture failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x2 frame: left half red, right half blue, bottom-right pixel white.
    fn frame() -> Frame {
        let mut pixels = Vec::new();
        for y in 0..2u32 {
            for x in 0..4u32 {
                let px = match (x, y) {
                    (3, 1) => [255, 255, 255, 255],
                    (x, _) if x < 2 => [255, 0, 0, 255],
                    _ => [0, 0, 255, 255],
                };
                pixels.extend_from_slice(&px);
            }
        }
        Frame::new(4, 2, pixels).unwrap()
    }

    struct FixedCapture(Frame);

    impl CaptureService for FixedCapture {
        fn capture(&self) -> Result<Frame, PickerError> {
            Ok(self.0.clone())
        }
    }

    struct FailingCapture;

    impl CaptureService for FailingCapture {
        fn capture(&self) -> Result<Frame, PickerError> {
            Err(PickerError::Capture("tab not visible".into()))
        }
    }

    #[test]
    fn new_rejects_mismatched_buffer() {
        assert!(matches!(
            Frame::new(2, 2, vec![0; 15]),
            Err(PickerError::InvalidDimensions)
        ));
        assert!(Frame::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn pixel_reads_rgb_and_ignores_alpha() {
        let f = frame();
        assert_eq!(f.pixel(0, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(f.pixel(2, 0), Some(Rgb::new(0, 0, 255)));
        assert_eq!(f.pixel(3, 1), Some(Rgb::new(255, 255, 255)));
        assert_eq!(f.pixel(4, 0), None);
    }

    #[test]
    fn sample_scales_by_device_pixel_ratio() {
        let f = frame();
        // CSS (1.5, 0.5) at 2x lands on raster (3, 1).
        assert_eq!(f.sample_hex(DVec2::new(1.5, 0.5), 2.0).as_deref(), Some("#ffffff"));
        // Same point at 1x is raster (1, 0).
        assert_eq!(f.sample_hex(DVec2::new(1.5, 0.5), 1.0).as_deref(), Some("#ff0000"));
    }

    #[test]
    fn sample_treats_bad_ratio_as_one() {
        let f = frame();
        assert_eq!(f.sample(DVec2::new(2.0, 0.0), 0.0), Some(Rgb::new(0, 0, 255)));
        assert_eq!(f.sample(DVec2::new(2.0, 0.0), f64::NAN), Some(Rgb::new(0, 0, 255)));
    }

    #[test]
    fn sample_outside_frame_is_none() {
        let f = frame();
        assert!(f.sample(DVec2::new(-0.5, 0.0), 1.0).is_none());
        assert!(f.sample(DVec2::new(4.0, 0.0), 1.0).is_none());
        assert!(f.sample(DVec2::new(0.0, 1.0), 2.0).is_none());
    }

    #[test]
    fn pick_samples_capture_and_ends_session() {
        let mut dropper = Eyedropper::default();
        dropper.start();
        let hex = dropper.pick(&FixedCapture(frame()), DVec2::new(3.0, 0.0), 1.0);
        assert_eq!(hex.as_deref(), Some("#0000ff"));
        assert_eq!(dropper.state(), EyedropperState::Idle);
    }

    #[test]
    fn pick_without_start_is_none() {
        let mut dropper = Eyedropper::default();
        assert!(dropper
            .pick(&FixedCapture(frame()), DVec2::ZERO, 1.0)
            .is_none());
    }

    #[test]
    fn cancelled_pick_yields_no_color() {
        let mut dropper = Eyedropper::default();
        dropper.start();
        assert!(dropper.cancel());
        assert!(!dropper.cancel());
        assert!(dropper
            .pick(&FixedCapture(frame()), DVec2::ZERO, 1.0)
            .is_none());
    }

    #[test]
    fn capture_failure_yields_no_color() {
        let mut dropper = Eyedropper::default();
        dropper.start();
        assert!(dropper.pick(&FailingCapture, DVec2::ZERO, 1.0).is_none());
        assert!(!dropper.is_picking());
    }

    #[cfg(feature = "png")]
    #[test]
    fn from_rgba_image_wraps_pixels() {
        let img = image::RgbaImage::from_pixel(3, 3, image::Rgba([1, 2, 3, 255]));
        let f = Frame::from_rgba_image(img).unwrap();
        assert_eq!(f.width(), 3);
        assert_eq!(f.pixel(2, 2), Some(Rgb::new(1, 2, 3)));
    }
}
