use serde::{Deserialize, Serialize};

/// Media category derived from a mime-type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Custom,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Custom => "custom",
        }
    }

    fn from_mime_type(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            FileCategory::Image
        } else if mime_type.starts_with("video/") {
            FileCategory::Video
        } else if mime_type.starts_with("audio/") {
            FileCategory::Audio
        } else {
            FileCategory::Custom
        }
    }
}

/// A normalized (extension, mime type) pair.
///
/// The extension is stored lowercased without a leading dot, the mime type
/// lowercased. The category is always recomputed from the mime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileType {
    extension: String,
    mime_type: String,
}

impl FileType {
    pub fn new(extension: impl AsRef<str>, mime_type: impl AsRef<str>) -> Self {
        Self {
            extension: extension
                .as_ref()
                .trim()
                .trim_start_matches('.')
                .to_lowercase(),
            mime_type: mime_type.as_ref().trim().to_lowercase(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_mime_type(&self.mime_type)
    }

    pub fn is_image(&self) -> bool {
        self.category() == FileCategory::Image
    }

    pub fn is_video(&self) -> bool {
        self.category() == FileCategory::Video
    }

    pub fn is_audio(&self) -> bool {
        self.category() == FileCategory::Audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_inputs() {
        let file_type = FileType::new(" .JPG ", "Image/JPEG");
        assert_eq!(file_type.extension(), "jpg");
        assert_eq!(file_type.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_category_from_mime_prefix() {
        assert_eq!(FileType::new("png", "image/png").category(), FileCategory::Image);
        assert_eq!(FileType::new("mp4", "video/mp4").category(), FileCategory::Video);
        assert_eq!(FileType::new("mp3", "audio/mpeg").category(), FileCategory::Audio);
        assert_eq!(
            FileType::new("pdf", "application/pdf").category(),
            FileCategory::Custom
        );
    }

    #[test]
    fn test_category_ignores_extension() {
        // A video mime wins over an image-looking extension.
        let file_type = FileType::new("png", "video/mp4");
        assert!(file_type.is_video());
        assert!(!file_type.is_image());
    }
}
