//! `appstore_game_center`: the Game Center detail of an app.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::instrument;

use super::DataSource;
use crate::client::AppStoreConnect;
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::state::{self, require, Fields, StateRecord};

/// State of an `appstore_game_center` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameCenterData {
    /// App whose game center is looked up.
    pub app_id: String,
    /// Identifier of the game center detail.
    pub id: Option<String>,
    /// Whether Game Center is enabled for Apple Arcade.
    pub arcade_enabled: bool,
    /// Whether challenges are enabled.
    pub challenge_enabled: bool,
}

impl StateRecord for GameCenterData {
    fn from_value(value: &Value) -> Result<Self, ProviderError> {
        let fields = Fields::new(value)?;
        Ok(Self {
            app_id: fields.string("app_id")?,
            id: fields.optional_string("id")?,
            arcade_enabled: fields.bool("arcade_enabled")?,
            challenge_enabled: fields.bool("challenge_enabled")?,
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "app_id": self.app_id,
            "id": state::optional(&self.id),
            "arcade_enabled": self.arcade_enabled,
            "challenge_enabled": self.challenge_enabled,
        })
    }
}

/// Looks up the game center of an app.
pub struct GameCenterDataSource<C> {
    client: Arc<C>,
}

impl<C: AppStoreConnect> GameCenterDataSource<C> {
    /// Create the data source around a configured client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl<C: AppStoreConnect> DataSource for GameCenterDataSource<C> {
    type State = GameCenterData;

    const TYPE_NAME: &'static str = "appstore_game_center";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("Use this data source to retrieve the game center of an app.")
            .with_attribute(
                "app_id",
                Attribute::required_string().with_description("Identifier of the app."),
            )
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Identifier of the game center."),
            )
            .with_attribute(
                "arcade_enabled",
                Attribute::computed_bool()
                    .with_description("Whether the game center is enabled for Apple Arcade."),
            )
            .with_attribute(
                "challenge_enabled",
                Attribute::computed_bool()
                    .with_description("Whether game center challenges are enabled."),
            )
    }

    #[instrument(skip_all, fields(app_id = %config.app_id))]
    async fn read(&self, config: GameCenterData) -> Result<GameCenterData, ProviderError> {
        require(&config.app_id, "app_id", "read a game center")?;

        let app = self
            .client
            .get_app(&config.app_id)
            .await
            .map_err(|e| ProviderError::upstream("Unable to Read App", e))?;

        let game_center = self
            .client
            .get_game_center(&app)
            .await
            .map_err(|e| ProviderError::upstream("Unable to Read Game Center", e))?;

        Ok(GameCenterData {
            id: Some(game_center.id),
            arcade_enabled: game_center.arcade_enabled,
            challenge_enabled: game_center.challenge_enabled,
            ..config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{App, GameCenter};
    use crate::testing::{Call, MockClient};

    fn dash() -> App {
        App {
            id: "app-1".to_string(),
            name: "Dash".to_string(),
            bundle_id: "com.example.dash".to_string(),
            sku: "DASH".to_string(),
        }
    }

    #[tokio::test]
    async fn test_read_game_center_of_app() {
        let client = MockClient::new();
        client.add_app_with_game_center(
            dash(),
            GameCenter {
                id: "gc-1".to_string(),
                arcade_enabled: true,
                challenge_enabled: false,
            },
        );
        let source = GameCenterDataSource::new(Arc::new(client.clone()));

        let data = source
            .read(GameCenterData {
                app_id: "app-1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(data.id.as_deref(), Some("gc-1"));
        assert!(data.arcade_enabled);
        assert!(!data.challenge_enabled);
        assert_eq!(
            client.calls(),
            vec![
                Call::GetApp("app-1".to_string()),
                Call::GetGameCenter("app-1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_requires_app_id() {
        let client = MockClient::new();
        let source = GameCenterDataSource::new(Arc::new(client.clone()));

        let err = source.read(GameCenterData::default()).await.unwrap_err();
        assert_eq!(err.attribute(), Some("app_id"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_read_app_without_game_center() {
        let client = MockClient::new();
        client.add_app(dash());
        let source = GameCenterDataSource::new(Arc::new(client));

        let err = source
            .read(GameCenterData {
                app_id: "app-1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().starts_with("Unable to Read Game Center"));
    }
}
