//! `appstore_achievement_image`: an image uploaded for an achievement localization.
//!
//! The MD5 checksum of the uploaded bytes is kept in state. Reading the
//! resource re-hashes the local file; when the file no longer matches, the
//! `file` attribute is cleared rather than failing. The next plan then sees
//! `file` change, `checksum` becomes unknown, and since `checksum` forces
//! replacement the image is uploaded again.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::Resource;
use crate::checksum::checksum;
use crate::client::AppStoreConnect;
use crate::error::{DriftDetected, ProviderError};
use crate::schema::{Attribute, Schema};
use crate::state::{self, require, require_id, Fields, StateRecord};

/// State of an `appstore_achievement_image`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AchievementImageState {
    /// Server-assigned identifier, unknown until created.
    pub id: Option<String>,
    /// Localization the image belongs to.
    pub achievement_localization_id: String,
    /// Path to the local image file. Empty after drift was detected.
    pub file: String,
    /// MD5 of the uploaded bytes, unknown until created.
    pub checksum: Option<String>,
}

impl StateRecord for AchievementImageState {
    fn from_value(value: &Value) -> Result<Self, ProviderError> {
        let fields = Fields::new(value)?;
        Ok(Self {
            id: fields.optional_string("id")?,
            achievement_localization_id: fields.string("achievement_localization_id")?,
            file: fields.string("file")?,
            checksum: fields.optional_string("checksum")?,
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "id": state::optional(&self.id),
            "achievement_localization_id": self.achievement_localization_id,
            "file": self.file,
            "checksum": state::optional(&self.checksum),
        })
    }
}

/// Manages achievement images. Any change replaces the image.
pub struct AchievementImageResource<C> {
    client: Arc<C>,
}

impl<C: AppStoreConnect> AchievementImageResource<C> {
    /// Create the resource around a configured client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

async fn read_file(path: &str) -> Result<Vec<u8>, ProviderError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ProviderError::Io {
            path: path.into(),
            source,
        })
}

/// Re-hash the file named in `state` and compare it with the stored checksum.
///
/// Returns `None` when the file still matches, or when `file` is already
/// empty from an earlier drift.
pub async fn detect_drift(
    state: &AchievementImageState,
) -> Result<Option<DriftDetected>, ProviderError> {
    if state.file.is_empty() {
        return Ok(None);
    }

    let current = checksum(&read_file(&state.file).await?);
    if state.checksum.as_deref() == Some(current.as_str()) {
        return Ok(None);
    }

    Ok(Some(DriftDetected {
        path: state.file.clone().into(),
        stored: state.checksum.clone().unwrap_or_default(),
        current,
    }))
}

#[async_trait::async_trait]
impl<C: AppStoreConnect> Resource for AchievementImageResource<C> {
    type State = AchievementImageState;

    const TYPE_NAME: &'static str = "appstore_achievement_image";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("Manages game center achievement localization images.")
            .with_attribute(
                "id",
                Attribute::computed_string()
                    .with_description("Identifier of the achievement image.")
                    .with_stable_value(),
            )
            .with_attribute(
                "achievement_localization_id",
                Attribute::required_string().with_description(
                    "Identifier of the achievement localization to associate the image with.",
                ),
            )
            .with_attribute(
                "file",
                Attribute::required_string().with_description("Path to the image file."),
            )
            .with_attribute(
                "checksum",
                Attribute::computed_string()
                    .with_description("MD5 checksum of the image.")
                    .with_force_new(),
            )
    }

    #[instrument(skip_all, fields(file = %config.file))]
    async fn create(
        &self,
        config: AchievementImageState,
    ) -> Result<AchievementImageState, ProviderError> {
        const PURPOSE: &str = "create an achievement image";
        require(
            &config.achievement_localization_id,
            "achievement_localization_id",
            PURPOSE,
        )?;
        require(&config.file, "file", PURPOSE)?;

        let image = read_file(&config.file).await?;

        let localization = self
            .client
            .get_achievement_localization(&config.achievement_localization_id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to get achievement localization", e))?;

        let file_name = Path::new(&config.file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.file.clone());

        let asset = self
            .client
            .create_achievement_image(&localization, &file_name, &image)
            .await
            .map_err(|e| ProviderError::upstream("Failed to create achievement image", e))?;

        debug!(id = %asset.id, bytes = image.len(), "Achievement image uploaded");
        Ok(AchievementImageState {
            id: Some(asset.id),
            checksum: Some(checksum(&image)),
            ..config
        })
    }

    #[instrument(skip_all, fields(id = ?state.id, file = %state.file))]
    async fn read(
        &self,
        mut state: AchievementImageState,
    ) -> Result<AchievementImageState, ProviderError> {
        let id = require_id(&state.id, "read an achievement image")?;

        self.client
            .get_achievement_image(id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to read achievement image", e))?;

        if let Some(drift) = detect_drift(&state).await? {
            warn!(%drift, "Clearing file so the image is uploaded again");
            state.file.clear();
        }

        Ok(state)
    }

    #[instrument(skip_all, fields(id = ?state.id))]
    async fn delete(&self, state: AchievementImageState) -> Result<(), ProviderError> {
        let id = require_id(&state.id, "delete an achievement image")?;

        self.client
            .delete_achievement_image(id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to delete achievement image", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AchievementImage, AchievementLocalization};
    use crate::testing::{Call, MockClient};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01];

    fn image_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn resource() -> (MockClient, AchievementImageResource<MockClient>) {
        let client = MockClient::new();
        client.add_localization(AchievementLocalization {
            id: "loc-1".to_string(),
            locale: "en-US".to_string(),
            name: "Speedrunner".to_string(),
            before_earned_description: "before".to_string(),
            after_earned_description: "after".to_string(),
        });
        (
            client.clone(),
            AchievementImageResource::new(Arc::new(client)),
        )
    }

    fn config(file: &NamedTempFile) -> AchievementImageState {
        AchievementImageState {
            id: None,
            achievement_localization_id: "loc-1".to_string(),
            file: file.path().to_string_lossy().into_owned(),
            checksum: None,
        }
    }

    #[tokio::test]
    async fn test_create_uploads_and_records_checksum() {
        let (client, resource) = resource();
        let file = image_file(PNG);

        let created = resource.create(config(&file)).await.unwrap();

        assert_eq!(created.checksum.as_deref(), Some(checksum(PNG).as_str()));
        let id = created.id.clone().unwrap();
        let uploaded = client.image(&id).unwrap();
        assert_eq!(uploaded.file_size, PNG.len() as u64);

        let expected_name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(uploaded.file_name, expected_name);
    }

    #[tokio::test]
    async fn test_create_rejects_each_missing_attribute() {
        type Blank = Box<dyn Fn(&mut AchievementImageState)>;
        let cases: Vec<(&str, Blank)> = vec![
            (
                "achievement_localization_id",
                Box::new(|s: &mut AchievementImageState| s.achievement_localization_id.clear()),
            ),
            ("file", Box::new(|s: &mut AchievementImageState| s.file.clear())),
        ];

        let file = image_file(PNG);
        for (attribute, blank) in cases {
            let (client, resource) = resource();
            let mut state = config(&file);
            blank(&mut state);

            let err = resource.create(state).await.unwrap_err();
            assert_eq!(err.attribute(), Some(attribute));
            assert!(client.calls().is_empty(), "client called for {}", attribute);
        }
    }

    #[tokio::test]
    async fn test_create_unreadable_file() {
        let (client, resource) = resource();
        let config = AchievementImageState {
            id: None,
            achievement_localization_id: "loc-1".to_string(),
            file: "/nonexistent/achievement.png".to_string(),
            checksum: None,
        };

        let err = resource.create(config).await.unwrap_err();
        assert!(matches!(err, ProviderError::Io { .. }));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_read_keeps_file_when_checksum_matches() {
        let (_client, resource) = resource();
        let file = image_file(PNG);
        let created = resource.create(config(&file)).await.unwrap();

        let read = resource.read(created.clone()).await.unwrap();
        assert_eq!(read, created);
    }

    #[tokio::test]
    async fn test_read_clears_file_on_drift() {
        let (_client, resource) = resource();
        let file = image_file(PNG);
        let created = resource.create(config(&file)).await.unwrap();

        std::fs::write(file.path(), b"edited out of band").unwrap();

        let read = resource.read(created.clone()).await.unwrap();
        assert_eq!(read.file, "");
        assert_eq!(read.checksum, created.checksum);
        assert_eq!(read.id, created.id);
    }

    #[tokio::test]
    async fn test_detect_drift() {
        let file = image_file(PNG);
        let mut state = config(&file);
        state.checksum = Some(checksum(PNG));
        assert_eq!(detect_drift(&state).await.unwrap(), None);

        std::fs::write(file.path(), b"edited").unwrap();
        let drift = detect_drift(&state).await.unwrap().unwrap();
        assert_eq!(drift.stored, checksum(PNG));
        assert_eq!(drift.current, checksum(b"edited"));
        assert_eq!(drift.path, file.path());
    }

    #[tokio::test]
    async fn test_read_unreadable_file_is_io_error() {
        let (_client, resource) = resource();
        let file = image_file(PNG);
        let created = resource.create(config(&file)).await.unwrap();
        let path = file.path().to_path_buf();
        drop(file);

        let err = resource.read(created).await.unwrap_err();
        match err {
            ProviderError::Io { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_after_drift_does_not_touch_filesystem() {
        let (client, resource) = resource();
        client.add_image(AchievementImage {
            id: "img-9".to_string(),
            file_name: "gold.png".to_string(),
            file_size: 4,
        });
        let state = AchievementImageState {
            id: Some("img-9".to_string()),
            achievement_localization_id: "loc-1".to_string(),
            file: String::new(),
            checksum: Some("abc".to_string()),
        };

        let read = resource.read(state.clone()).await.unwrap();
        assert_eq!(read, state);
    }

    #[tokio::test]
    async fn test_update_is_noop() {
        let (client, resource) = resource();
        let file = image_file(PNG);
        let created = resource.create(config(&file)).await.unwrap();
        let calls_before = client.calls().len();

        let updated = resource.update(created.clone(), created.clone()).await.unwrap();
        assert_eq!(updated, created);
        assert_eq!(client.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_delete() {
        let (client, resource) = resource();
        let file = image_file(PNG);
        let created = resource.create(config(&file)).await.unwrap();
        let id = created.id.clone().unwrap();

        resource.delete(created).await.unwrap();
        assert!(client.calls().contains(&Call::DeleteAchievementImage(id.clone())));
        assert!(client.image(&id).is_none());
    }
}
