/// Image preprocessing for OCR
///
/// Grayscale conversion followed by a linear contrast/brightness stretch,
/// which pushes the game's light UI text towards white and the background
/// towards black before Tesseract sees it.
use image::{GrayImage, Luma, RgbaImage};

pub struct ImagePreprocessor {
    contrast: f32,
    brightness: f32,
}

impl ImagePreprocessor {
    pub fn new(contrast: f32, brightness: f32) -> Self {
        Self {
            contrast,
            brightness,
        }
    }

    pub fn preprocess(&self, image: &RgbaImage) -> GrayImage {
        let mut gray = image::imageops::grayscale(image);
        for pixel in gray.pixels_mut() {
            *pixel = Luma([adjust(pixel[0], self.contrast, self.brightness)]);
        }
        gray
    }
}

/// `clamp(value * contrast + brightness)` into 0..=255
pub fn adjust(value: u8, contrast: f32, brightness: f32) -> u8 {
    (value as f32 * contrast + brightness).round().clamp(0.0, 255.0) as u8
}
