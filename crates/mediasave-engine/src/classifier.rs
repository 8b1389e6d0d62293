//! File-type classification.
//!
//! Maps caller hints (extension and/or mime type) onto a canonical
//! [`FileType`]. Classification never fails: anything unknown becomes a
//! custom type.

use mediasave_core::constants::{DEFAULT_EXTENSION, DEFAULT_MIME_TYPE};
use mediasave_core::FileType;

/// (extension, mime type) pairs, searched in order.
type Table = &'static [(&'static str, &'static str)];

const IMAGE_TYPES: Table = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("avif", "image/avif"),
    ("tiff", "image/tiff"),
    ("tif", "image/tiff"),
    ("ico", "image/x-icon"),
];

const VIDEO_TYPES: Table = &[
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("m4v", "video/x-m4v"),
    ("3gp", "video/3gpp"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
];

const AUDIO_TYPES: Table = &[
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/x-flac"),
    ("caf", "audio/x-caf"),
    ("opus", "audio/opus"),
];

fn normalize(hint: Option<&str>) -> Option<String> {
    hint.map(|h| h.trim().trim_start_matches('.').trim().to_lowercase())
        .filter(|h| !h.is_empty())
}

/// Classify a file from its extension and mime-type hints.
///
/// Image, video and audio tables are searched in that order; an entry
/// matches when its mime type equals the mime hint or its extension equals
/// the extension hint, and the first match wins. Unknown inputs keep their
/// own extension and mime type (defaulting to `bin` and
/// `application/octet-stream`) and land in the custom category.
pub fn classify(extension_hint: Option<&str>, mime_hint: Option<&str>) -> FileType {
    let extension = normalize(extension_hint);
    let mime_type = normalize(mime_hint);

    let known = [IMAGE_TYPES, VIDEO_TYPES, AUDIO_TYPES]
        .into_iter()
        .flatten()
        .find(|(ext, mime)| {
            mime_type.as_deref() == Some(*mime) || extension.as_deref() == Some(*ext)
        });

    match known {
        Some((ext, mime)) => FileType::new(*ext, *mime),
        None => FileType::new(
            extension.as_deref().unwrap_or(DEFAULT_EXTENSION),
            mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediasave_core::FileCategory;

    #[test]
    fn test_extension_and_mime_agree() {
        let by_ext = classify(Some("jpg"), None);
        let by_mime = classify(None, Some("image/jpeg"));
        let by_both = classify(Some("jpg"), Some("image/jpeg"));

        assert_eq!(by_ext, by_both);
        assert_eq!(by_mime.mime_type(), "image/jpeg");
        assert_eq!(by_mime.category(), FileCategory::Image);
        assert_eq!(by_both.extension(), "jpg");
    }

    #[test]
    fn test_hints_are_normalized() {
        let file_type = classify(Some(" .PNG "), Some("IMAGE/PNG"));
        assert_eq!(file_type.extension(), "png");
        assert_eq!(file_type.mime_type(), "image/png");
    }

    #[test]
    fn test_earlier_table_wins() {
        // mp4 matches the video table before audio/mp4 is reached
        let file_type = classify(Some("mp4"), Some("audio/mp4"));
        assert_eq!(file_type.category(), FileCategory::Video);

        let file_type = classify(None, Some("audio/mp4"));
        assert_eq!(file_type.extension(), "m4a");
        assert_eq!(file_type.category(), FileCategory::Audio);
    }

    #[test]
    fn test_every_table_entry_round_trips() {
        for table in [IMAGE_TYPES, VIDEO_TYPES, AUDIO_TYPES] {
            for (ext, mime) in table.iter() {
                let file_type = classify(Some(*ext), None);
                assert_eq!(file_type.mime_type(), *mime, "extension {}", ext);
            }
        }
    }

    #[test]
    fn test_unknown_is_custom() {
        let file_type = classify(Some("xyz123"), Some("application/unknown"));
        assert_eq!(file_type.category(), FileCategory::Custom);
        assert_eq!(file_type.extension(), "xyz123");
        assert_eq!(file_type.mime_type(), "application/unknown");
    }

    #[test]
    fn test_missing_hints_default() {
        for (ext, mime) in [(None, None), (Some(""), Some("  ")), (Some("."), None)] {
            let file_type = classify(ext, mime);
            assert_eq!(file_type.extension(), "bin");
            assert_eq!(file_type.mime_type(), "application/octet-stream");
            assert_eq!(file_type.category(), FileCategory::Custom);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(classify(Some("heic"), None), classify(Some("heic"), None));
        }
    }
}
