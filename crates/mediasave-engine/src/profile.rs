use mediasave_core::{
    CapabilityValidator, CapabilityVerdict, FileCategory, FileType, PersistError,
};

/// Per-category behavior of the orchestrator.
///
/// Every category is saved through the same pipeline; the profile only says
/// where entries go by default and which formats skip the capability
/// validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProfile {
    pub category: FileCategory,
    pub collection_dir: &'static str,
    /// Extensions that never reach the validator.
    pub always_supported: &'static [&'static str],
    /// Whether formats outside `always_supported` are checked at all.
    pub gated: bool,
}

const IMAGE: CategoryProfile = CategoryProfile {
    category: FileCategory::Image,
    collection_dir: "Pictures",
    always_supported: &["png", "jpg", "jpeg", "gif", "bmp"],
    gated: true,
};

const VIDEO: CategoryProfile = CategoryProfile {
    category: FileCategory::Video,
    collection_dir: "Movies",
    always_supported: &["mp4", "mov", "m4v", "3gp"],
    gated: true,
};

const AUDIO: CategoryProfile = CategoryProfile {
    category: FileCategory::Audio,
    collection_dir: "Music",
    always_supported: &["mp3", "aac", "wav", "m4a", "caf"],
    gated: true,
};

const CUSTOM: CategoryProfile = CategoryProfile {
    category: FileCategory::Custom,
    collection_dir: "Download",
    always_supported: &[],
    gated: false,
};

impl CategoryProfile {
    pub fn for_category(category: FileCategory) -> &'static CategoryProfile {
        match category {
            FileCategory::Image => &IMAGE,
            FileCategory::Video => &VIDEO,
            FileCategory::Audio => &AUDIO,
            FileCategory::Custom => &CUSTOM,
        }
    }

    /// Run the pre-flight capability check for `file_type`.
    pub fn check(
        &self,
        file_type: &FileType,
        validator: &dyn CapabilityValidator,
    ) -> Result<(), PersistError> {
        let extension = file_type.extension();
        if !self.gated || self.always_supported.iter().any(|ext| *ext == extension) {
            return Ok(());
        }

        match validator.check(file_type) {
            CapabilityVerdict::Supported => Ok(()),
            CapabilityVerdict::Unsupported(reason) => {
                Err(PersistError::unsupported(extension, reason))
            }
        }
    }
}
