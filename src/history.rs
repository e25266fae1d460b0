use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One produced image. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageVersion {
    pub id: String,
    pub image_url: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_region: Option<String>,
}

impl ImageVersion {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            image_url: image_url.into(),
            timestamp: Utc::now(),
            prompt: None,
            edited_region: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Attach the mask data URI that produced this version.
    pub fn with_edited_region(mut self, mask_data_url: impl Into<String>) -> Self {
        self.edited_region = Some(mask_data_url.into());
        self
    }
}

/// Append-only session history with a pointer to the currently displayed
/// version. No dedup, no eviction, no persistence.
#[derive(Debug, Default)]
pub struct VersionHistory {
    versions: Vec<ImageVersion>,
    current: Option<String>,
}

impl VersionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always succeeds; the new entry becomes the current version.
    pub fn append(&mut self, version: ImageVersion) -> &ImageVersion {
        self.current = Some(version.id.clone());
        self.versions.push(version);
        let last = self.versions.len() - 1;
        &self.versions[last]
    }

    /// Move the current pointer. A pure pointer update: the stored list is
    /// untouched, and an unknown id leaves the pointer where it was.
    pub fn select(&mut self, id: &str) -> Option<&ImageVersion> {
        let found = self.versions.iter().find(|v| v.id == id)?;
        self.current = Some(found.id.clone());
        Some(found)
    }

    pub fn current(&self) -> Option<&ImageVersion> {
        let id = self.current.as_deref()?;
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn versions(&self) -> &[ImageVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_never_discards_and_updates_current() {
        let mut history = VersionHistory::new();
        let first_id = history
            .append(ImageVersion::new("data:image/png;base64,AAAA"))
            .id
            .clone();
        let second_id = history
            .append(
                ImageVersion::new("data:image/png;base64,BBBB").with_prompt("add a red hat"),
            )
            .id
            .clone();

        assert_eq!(history.len(), 2);
        assert_ne!(first_id, second_id);
        assert_eq!(history.current().unwrap().id, second_id);
    }

    #[test]
    fn test_select_moves_pointer_without_mutating_list() {
        let mut history = VersionHistory::new();
        let first_id = history.append(ImageVersion::new("a")).id.clone();
        history.append(ImageVersion::new("b"));

        let snapshot: Vec<String> = history.versions().iter().map(|v| v.id.clone()).collect();
        assert!(history.select(&first_id).is_some());

        let after: Vec<String> = history.versions().iter().map(|v| v.id.clone()).collect();
        assert_eq!(snapshot, after);
        assert_eq!(history.current().unwrap().id, first_id);
    }

    #[test]
    fn test_select_unknown_id_is_a_no_op() {
        let mut history = VersionHistory::new();
        let id = history.append(ImageVersion::new("a")).id.clone();

        assert!(history.select("not-a-version").is_none());
        assert_eq!(history.current().unwrap().id, id);
    }

    #[test]
    fn test_duplicate_urls_are_kept() {
        let mut history = VersionHistory::new();
        history.append(ImageVersion::new("same"));
        history.append(ImageVersion::new("same"));
        assert_eq!(history.len(), 2);
    }
}
