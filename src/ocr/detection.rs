/// Tesseract OCR detection
///
/// Owns the Tesseract instance and turns a preprocessed image into
/// positioned text lines.
use super::tsv;
use crate::capture::TextFragment;
use crate::error::OcrError;
use image::GrayImage;
use leptess::{LepTess, Variable};
use std::path::{Path, PathBuf};

pub struct TesseractDetector {
    tess: LepTess,
    temp_path: PathBuf,
}

impl TesseractDetector {
    pub fn new(tessdata_dir: Option<&Path>, language: &str) -> Result<Self, OcrError> {
        tracing::info!("Initializing Tesseract OCR ({})...", language);

        let data_path = tessdata_dir.and_then(|p| p.to_str());
        let mut tess =
            LepTess::new(data_path, language).map_err(|e| OcrError::InitFailed(Box::new(e)))?;

        // PSM 3 = Fully automatic page segmentation, but no OSD
        tess.set_variable(Variable::TesseditPagesegMode, "3")
            .map_err(|e| OcrError::InitFailed(Box::new(e)))?;

        tracing::info!("✓ Tesseract OCR initialized");

        Ok(Self {
            tess,
            temp_path: std::env::temp_dir()
                .join(format!("deck_tally_ocr_{}.png", std::process::id())),
        })
    }

    /// Recognize text lines in a preprocessed image
    pub fn detect_lines(&mut self, image: &GrayImage) -> Result<Vec<TextFragment>, OcrError> {
        // leptess reads images from a path
        image
            .save(&self.temp_path)
            .map_err(|e| OcrError::EncodeFailed(Box::new(e)))?;

        let result = self
            .tess
            .set_image(&self.temp_path)
            .map_err(|e| OcrError::RecognitionFailed(Box::new(e)))
            .and_then(|_| {
                self.tess
                    .get_tsv_text(0)
                    .map_err(|e| OcrError::RecognitionFailed(Box::new(e)))
            });

        let _ = std::fs::remove_file(&self.temp_path);

        let lines = tsv::lines_from_tsv(&result?);
        for line in &lines {
            tracing::trace!("[ocr] y={} {}", line.top, line.text);
        }
        Ok(lines)
    }
}
