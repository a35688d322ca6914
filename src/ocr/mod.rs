/// OCR module
///
/// Turns a captured window image into positioned text lines.
///
/// - `tsv`: assembles lines from Tesseract's TSV output (always built)
/// - `preprocessing`: grayscale + contrast stretch (feature `live-capture`)
/// - `detection`: Tesseract integration (feature `live-capture`)
pub mod tsv;

#[cfg(feature = "live-capture")]
mod detection;
#[cfg(feature = "live-capture")]
pub mod preprocessing;

#[cfg(feature = "live-capture")]
pub use manager::OcrManager;

#[cfg(feature = "live-capture")]
mod manager {
    use super::detection::TesseractDetector;
    use super::preprocessing::ImagePreprocessor;
    use crate::capture::TextFragment;
    use crate::config::OcrConfig;
    use crate::error::OcrError;
    use image::RgbaImage;

    /// Preprocessing plus a reused Tesseract instance
    pub struct OcrManager {
        preprocessor: ImagePreprocessor,
        detector: TesseractDetector,
    }

    impl OcrManager {
        pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
            let preprocessor = ImagePreprocessor::new(config.contrast, config.brightness);
            let detector =
                TesseractDetector::new(config.tessdata_dir.as_deref(), &config.language)?;

            tracing::info!(
                "  Contrast: {} / Brightness: {}",
                config.contrast,
                config.brightness
            );

            Ok(Self {
                preprocessor,
                detector,
            })
        }

        /// Recognized lines in recognition order (not yet sorted)
        pub fn recognize(&mut self, image: &RgbaImage) -> Result<Vec<TextFragment>, OcrError> {
            let gray = self.preprocessor.preprocess(image);
            self.detector.detect_lines(&gray)
        }
    }
}
