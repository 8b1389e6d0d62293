//! Format capability checks.
//!
//! `check_capability` is the pre-flight gate the orchestrator runs before
//! touching storage. `CodecTableValidator` is the shipped
//! [`CapabilityValidator`]: it answers from a table of available encoders,
//! enumerated once and cached for the lifetime of the validator.

use std::collections::HashSet;
use std::sync::OnceLock;

use mediasave_core::{
    CapabilityValidator, CapabilityVerdict, FileCategory, FileType, PersistError,
};

use crate::profile::CategoryProfile;

/// Reject formats this host cannot write.
///
/// Always-supported formats of each category pass without consulting
/// `validator`; custom files are never gated.
pub fn check_capability(
    file_type: &FileType,
    validator: &dyn CapabilityValidator,
) -> Result<(), PersistError> {
    CategoryProfile::for_category(file_type.category()).check(file_type, validator)
}

/// Container mime type → encoder mime types able to fill it.
const CONTAINER_CODECS: &[(&str, &[&str])] = &[
    (
        "video/mp4",
        &["video/avc", "video/hevc", "video/av01", "video/mp4v-es"],
    ),
    ("video/quicktime", &["video/avc", "video/hevc"]),
    ("video/3gpp", &["video/3gpp", "video/mp4v-es"]),
    (
        "video/webm",
        &["video/x-vnd.on2.vp8", "video/x-vnd.on2.vp9", "video/av01"],
    ),
    (
        "video/x-matroska",
        &["video/avc", "video/hevc", "video/x-vnd.on2.vp9"],
    ),
    ("audio/mp4", &["audio/mp4a-latm"]),
    ("audio/mpeg", &["audio/mpeg"]),
    ("audio/aac", &["audio/mp4a-latm", "audio/aac"]),
    ("audio/ogg", &["audio/opus", "audio/vorbis"]),
    (
        "audio/wav",
        &["audio/raw", "audio/g711-alaw", "audio/g711-mlaw"],
    ),
    ("audio/x-flac", &["audio/flac"]),
];

/// Encoders assumed on a desktop host when nothing else is configured.
const DEFAULT_ENCODERS: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "video/avc",
    "video/hevc",
    "video/mp4v-es",
    "video/3gpp",
    "video/x-vnd.on2.vp8",
    "video/x-vnd.on2.vp9",
    "audio/mp4a-latm",
    "audio/aac",
    "audio/opus",
    "audio/vorbis",
    "audio/flac",
    "audio/raw",
    "audio/g711-alaw",
    "audio/g711-mlaw",
];

/// Enumerates the encoder mime types available on this host.
pub trait EncoderSource: Send + Sync {
    fn encoder_mime_types(&self) -> Vec<String>;
}

/// Encoder source backed by a fixed list.
#[derive(Debug, Clone)]
pub struct StaticEncoderSource {
    mime_types: Vec<String>,
}

impl StaticEncoderSource {
    pub fn new<I, S>(mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mime_types: mime_types.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticEncoderSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODERS.iter().copied())
    }
}

impl EncoderSource for StaticEncoderSource {
    fn encoder_mime_types(&self) -> Vec<String> {
        self.mime_types.clone()
    }
}

#[derive(Debug, Default)]
struct EncoderTable {
    image: HashSet<String>,
    video: HashSet<String>,
    audio: HashSet<String>,
}

impl EncoderTable {
    fn build(mime_types: Vec<String>) -> Self {
        let mut table = EncoderTable::default();
        for mime in mime_types {
            let mime = mime.trim().to_lowercase();
            if mime.starts_with("image/") {
                table.image.insert(mime);
            } else if mime.starts_with("video/") {
                table.video.insert(mime);
            } else if mime.starts_with("audio/") {
                table.audio.insert(mime);
            }
        }
        table
    }

    fn for_category(&self, category: FileCategory) -> Option<&HashSet<String>> {
        match category {
            FileCategory::Image => Some(&self.image),
            FileCategory::Video => Some(&self.video),
            FileCategory::Audio => Some(&self.audio),
            FileCategory::Custom => None,
        }
    }
}

/// Capability validator over an encoder table plus a minimum platform
/// version for newer image formats.
pub struct CodecTableValidator<S = StaticEncoderSource> {
    source: S,
    platform_version: u32,
    encoders: OnceLock<EncoderTable>,
}

impl<S: EncoderSource> CodecTableValidator<S> {
    pub fn new(source: S, platform_version: u32) -> Self {
        Self {
            source,
            platform_version,
            encoders: OnceLock::new(),
        }
    }

    fn table(&self) -> &EncoderTable {
        self.encoders.get_or_init(|| {
            let table = EncoderTable::build(self.source.encoder_mime_types());
            tracing::debug!(
                image = table.image.len(),
                video = table.video.len(),
                audio = table.audio.len(),
                "Enumerated available encoders"
            );
            table
        })
    }

    fn check_minimum_version(&self, extension: &str) -> Result<(), String> {
        let min_version = match extension {
            "heic" | "heif" => 28,
            "avif" => 31,
            _ => return Ok(()),
        };

        if self.platform_version < min_version {
            return Err(format!(
                "{} format requires at least platform version {}",
                extension, min_version
            ));
        }
        Ok(())
    }

    fn check_image(&self, file_type: &FileType) -> CapabilityVerdict {
        let extension = file_type.extension();

        if let Err(reason) = self.check_minimum_version(extension) {
            return CapabilityVerdict::Unsupported(reason);
        }

        let candidates: Vec<&str> = match extension {
            "heic" | "heif" => vec!["image/heic", "image/heif", "image/vnd.android.heic"],
            "webp" => vec!["image/webp"],
            "avif" => vec!["image/avif"],
            _ => vec![file_type.mime_type()],
        };

        let available = &self.table().image;
        if !available.is_empty() && candidates.iter().any(|mime| available.contains(*mime)) {
            CapabilityVerdict::Supported
        } else {
            no_encoder(extension)
        }
    }

    fn check_media(&self, file_type: &FileType, available: &HashSet<String>) -> CapabilityVerdict {
        let mime_type = file_type.mime_type();
        let codecs: Vec<&str> = CONTAINER_CODECS
            .iter()
            .find(|(container, _)| *container == mime_type)
            .map(|(_, codecs)| codecs.to_vec())
            .unwrap_or_else(|| vec![mime_type]);

        if codecs.iter().any(|codec| available.contains(*codec)) {
            CapabilityVerdict::Supported
        } else {
            no_encoder(file_type.extension())
        }
    }
}

impl Default for CodecTableValidator<StaticEncoderSource> {
    fn default() -> Self {
        Self::new(
            StaticEncoderSource::default(),
            mediasave_core::constants::DEFAULT_PLATFORM_VERSION,
        )
    }
}

fn no_encoder(extension: &str) -> CapabilityVerdict {
    CapabilityVerdict::Unsupported(format!(
        "The device does not support an encoder for the {} format.",
        extension
    ))
}

impl<S: EncoderSource> CapabilityValidator for CodecTableValidator<S> {
    fn check(&self, file_type: &FileType) -> CapabilityVerdict {
        match file_type.category() {
            FileCategory::Image => self.check_image(file_type),
            category => match self.table().for_category(category) {
                Some(available) => self.check_media(file_type, available),
                None => CapabilityVerdict::Supported,
            },
        }
    }
}
