use crate::error::PersistError;
use crate::storage_types::StorageModel;

use super::FileCategory;

impl FileCategory {
    /// Public collection a category is routed to when no sub-collection is given.
    pub fn collection_dir(&self) -> &'static str {
        match self {
            FileCategory::Image => "Pictures",
            FileCategory::Video => "Movies",
            FileCategory::Audio => "Music",
            FileCategory::Custom => "Download",
        }
    }
}

/// Where an entry lands: the category's collection, an optional
/// sub-collection inside it, and the backend that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocation {
    pub category: FileCategory,
    pub sub_collection: Option<String>,
    pub backend: StorageModel,
}

impl TargetLocation {
    /// Build a target, normalizing the sub-collection.
    ///
    /// Blank sub-collections are dropped. Sub-collections that could escape
    /// the collection (`..`, leading `/`, backslashes) are rejected.
    pub fn new(
        category: FileCategory,
        sub_collection: Option<&str>,
        backend: StorageModel,
    ) -> Result<Self, PersistError> {
        let sub_collection = match sub_collection.map(str::trim) {
            None | Some("") => None,
            Some(sub) => {
                if sub.starts_with('/')
                    || sub.contains('\\')
                    || sub.split('/').any(|part| part == ".." || part == ".")
                {
                    return Err(PersistError::InvalidFile(format!(
                        "Sub-collection is not a plain relative name: {}",
                        sub
                    )));
                }
                let sub = sub.trim_end_matches('/');
                if sub.is_empty() {
                    None
                } else {
                    Some(sub.to_string())
                }
            }
        };

        Ok(Self {
            category,
            sub_collection,
            backend,
        })
    }

    /// Relative directory without a trailing slash, e.g. `Pictures/MyAlbum`.
    pub fn relative_dir(&self) -> String {
        let base = self.category.collection_dir();
        match &self.sub_collection {
            Some(sub) => format!("{}/{}", base, sub),
            None => base.to_string(),
        }
    }

    /// Same target with the sub-collection removed.
    pub fn without_sub_collection(&self) -> Self {
        Self {
            category: self.category,
            sub_collection: None,
            backend: self.backend,
        }
    }
}
