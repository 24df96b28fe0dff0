// src/image_validator.rs
use crate::types::ImageMime;
use tracing::{debug, warn};

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, PartialEq)]
pub struct ImageValidationError {
    pub error_type: ImageErrorType,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorType {
    CorruptedFile,
    WrongFormat,
    EmptyFile,
    TooLarge,
}

impl ImageErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CorruptedFile => "IMAGE_CORRUPTED",
            Self::WrongFormat => "IMAGE_WRONG_FORMAT",
            Self::EmptyFile => "IMAGE_EMPTY",
            Self::TooLarge => "IMAGE_TOO_LARGE",
        }
    }
}

impl std::fmt::Display for ImageValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.error_type.code())
    }
}

pub struct ImageValidator;

impl ImageValidator {
    /// Identify PNG or JPEG content from its leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<ImageMime> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(ImageMime::Png)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(ImageMime::Jpeg)
        } else {
            None
        }
    }

    /// Validate an offer letter image before it is sent for analysis.
    ///
    /// `declared` is the format claimed by the upload (content type or file
    /// extension). When absent the format is taken from the signature alone.
    pub fn validate(
        bytes: &[u8],
        declared: Option<ImageMime>,
        max_bytes: usize,
    ) -> Result<ImageMime, ImageValidationError> {
        if bytes.is_empty() {
            return Err(ImageValidationError {
                error_type: ImageErrorType::EmptyFile,
                message: "Offer letter image is empty".to_string(),
                suggestion: "Please upload a valid image file".to_string(),
            });
        }

        if bytes.len() > max_bytes {
            return Err(ImageValidationError {
                error_type: ImageErrorType::TooLarge,
                message: format!(
                    "Image file too large: {:.1}MB (max {:.1}MB)",
                    bytes.len() as f64 / 1024.0 / 1024.0,
                    max_bytes as f64 / 1024.0 / 1024.0
                ),
                suggestion: "Please resize or compress your image and try again".to_string(),
            });
        }

        let detected = Self::sniff(bytes);

        match (declared, detected) {
            (Some(declared), Some(detected)) if declared == detected => {
                debug!("Image signature matches declared type {}", declared);
                Ok(detected)
            }
            (Some(declared), Some(detected)) => {
                warn!("Image declared as {} but content is {}", declared, detected);
                Err(ImageValidationError {
                    error_type: ImageErrorType::WrongFormat,
                    message: format!("File is {} but was declared as {}", detected, declared),
                    suggestion: format!(
                        "Please rename the file to match its {} content or convert it",
                        detected
                    ),
                })
            }
            (None, Some(detected)) => Ok(detected),
            (Some(declared), None) => Err(ImageValidationError {
                error_type: ImageErrorType::CorruptedFile,
                message: format!("Invalid {} file - corrupted or wrong format", declared),
                suggestion: format!("Please upload a valid {} image file", declared),
            }),
            (None, None) => Err(ImageValidationError {
                error_type: ImageErrorType::WrongFormat,
                message: "Unsupported image format".to_string(),
                suggestion: "Please use PNG or JPEG format only".to_string(),
            }),
        }
    }
}
