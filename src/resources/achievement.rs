//! `appstore_achievement`: a Game Center achievement.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::Resource;
use crate::client::{AchievementUpdate, AppStoreConnect, NewAchievement};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::state::{self, require, require_id, Fields, StateRecord};

/// State of an `appstore_achievement`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AchievementState {
    /// Server-assigned identifier, unknown until created.
    pub id: Option<String>,
    /// Game center the achievement belongs to.
    pub game_center_id: String,
    /// Internal name.
    pub reference_name: String,
    /// Alphanumeric vendor identifier.
    pub vendor_id: String,
    /// Points the achievement is worth.
    pub points: i64,
    /// Whether the achievement can be earned repeatedly.
    pub repeatable: bool,
    /// Whether the achievement is shown before it is earned.
    pub show_before_earned: bool,
}

impl StateRecord for AchievementState {
    fn from_value(value: &Value) -> Result<Self, ProviderError> {
        let fields = Fields::new(value)?;
        Ok(Self {
            id: fields.optional_string("id")?,
            game_center_id: fields.string("game_center_id")?,
            reference_name: fields.string("reference_name")?,
            vendor_id: fields.string("vendor_id")?,
            points: fields.int64("points")?,
            repeatable: fields.bool("repeatable")?,
            show_before_earned: fields.bool("show_before_earned")?,
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "id": state::optional(&self.id),
            "game_center_id": self.game_center_id,
            "reference_name": self.reference_name,
            "vendor_id": self.vendor_id,
            "points": self.points,
            "repeatable": self.repeatable,
            "show_before_earned": self.show_before_earned,
        })
    }
}

/// Manages achievements; the only resource with an in-place update.
pub struct AchievementResource<C> {
    client: Arc<C>,
}

impl<C: AppStoreConnect> AchievementResource<C> {
    /// Create the resource around a configured client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl<C: AppStoreConnect> Resource for AchievementResource<C> {
    type State = AchievementState;

    const TYPE_NAME: &'static str = "appstore_achievement";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("Manages game center achievement.")
            .with_attribute(
                "id",
                Attribute::computed_string()
                    .with_description("Identifier of the achievement.")
                    .with_stable_value(),
            )
            .with_attribute(
                "game_center_id",
                Attribute::required_string()
                    .with_description(
                        "Identifier of the game center to associate the achievement with. \
                         Resource will be re-created if this value is changed.",
                    )
                    .with_force_new(),
            )
            .with_attribute(
                "reference_name",
                Attribute::required_string().with_description("An internal name of the achievement."),
            )
            .with_attribute(
                "vendor_id",
                Attribute::required_string()
                    .with_description(
                        "A chosen alphanumeric identifier of the achievement. \
                         Resource will be re-created if this value is changed.",
                    )
                    .with_force_new(),
            )
            .with_attribute(
                "points",
                Attribute::required_int64()
                    .with_description("The points that each achievement is worth."),
            )
            .with_attribute(
                "repeatable",
                Attribute::required_bool().with_description(
                    "An indication of whether the player can earn the achievement multiple times.",
                ),
            )
            .with_attribute(
                "show_before_earned",
                Attribute::required_bool().with_description(
                    "An indication of whether the achievement is visible to the player before it is earned.",
                ),
            )
    }

    #[instrument(skip_all, fields(vendor_id = %config.vendor_id))]
    async fn create(&self, config: AchievementState) -> Result<AchievementState, ProviderError> {
        const PURPOSE: &str = "create an achievement";
        require(&config.game_center_id, "game_center_id", PURPOSE)?;
        require(&config.reference_name, "reference_name", PURPOSE)?;
        require(&config.vendor_id, "vendor_id", PURPOSE)?;
        if config.points == 0 {
            return Err(ProviderError::missing(
                "points",
                "Attribute 'points' must be non-zero to create an achievement.",
            ));
        }

        let game_center = self
            .client
            .get_game_center_by_id(&config.game_center_id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to read game center", e))?;

        let created = self
            .client
            .create_achievement(
                &game_center,
                &NewAchievement {
                    reference_name: config.reference_name.clone(),
                    vendor_id: config.vendor_id.clone(),
                    points: config.points,
                    repeatable: config.repeatable,
                    show_before_earned: config.show_before_earned,
                },
            )
            .await
            .map_err(|e| ProviderError::upstream("Failed to create achievement", e))?;

        debug!(id = %created.id, "Achievement created");
        Ok(AchievementState {
            id: Some(created.id),
            ..config
        })
    }

    #[instrument(skip_all, fields(id = ?state.id))]
    async fn read(&self, state: AchievementState) -> Result<AchievementState, ProviderError> {
        let id = require_id(&state.id, "read an achievement")?;

        let achievement = self
            .client
            .get_achievement(id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to read achievement", e))?;

        Ok(AchievementState {
            reference_name: achievement.reference_name,
            vendor_id: achievement.vendor_id,
            points: achievement.points,
            repeatable: achievement.repeatable,
            show_before_earned: achievement.show_before_earned,
            ..state
        })
    }

    #[instrument(skip_all, fields(id = ?planned.id))]
    async fn update(
        &self,
        prior: AchievementState,
        planned: AchievementState,
    ) -> Result<AchievementState, ProviderError> {
        let id = planned.id.clone().or(prior.id);
        let id = require_id(&id, "update an achievement")?;

        self.client
            .update_achievement(&AchievementUpdate {
                id: id.to_string(),
                reference_name: planned.reference_name.clone(),
                points: planned.points,
                repeatable: planned.repeatable,
                show_before_earned: planned.show_before_earned,
            })
            .await
            .map_err(|e| ProviderError::upstream("Failed to update achievement", e))?;

        Ok(AchievementState {
            id: Some(id.to_string()),
            ..planned
        })
    }

    #[instrument(skip_all, fields(id = ?state.id))]
    async fn delete(&self, state: AchievementState) -> Result<(), ProviderError> {
        let id = require_id(&state.id, "delete an achievement")?;

        self.client
            .delete_achievement(id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to delete achievement", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, GameCenter};
    use crate::testing::{Call, MockClient};

    fn speedrunner() -> AchievementState {
        AchievementState {
            id: None,
            game_center_id: "gc-1".to_string(),
            reference_name: "Speedrunner".to_string(),
            vendor_id: "SPEEDRUN_1".to_string(),
            points: 100,
            repeatable: false,
            show_before_earned: true,
        }
    }

    fn resource() -> (MockClient, AchievementResource<MockClient>) {
        let client = MockClient::new();
        client.add_game_center(GameCenter {
            id: "gc-1".to_string(),
            arcade_enabled: false,
            challenge_enabled: true,
        });
        (client.clone(), AchievementResource::new(Arc::new(client)))
    }

    #[tokio::test]
    async fn test_create_assigns_server_id() {
        let (client, resource) = resource();

        let created = resource.create(speedrunner()).await.unwrap();

        let id = created.id.clone().unwrap();
        assert!(!id.is_empty());
        assert_eq!(client.achievement(&id).unwrap().vendor_id, "SPEEDRUN_1");
        assert_eq!(
            created,
            AchievementState {
                id: Some(id),
                ..speedrunner()
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_each_missing_attribute() {
        let cases: Vec<(&str, Box<dyn Fn(&mut AchievementState)>)> = vec![
            ("game_center_id", Box::new(|s: &mut AchievementState| s.game_center_id.clear())),
            ("reference_name", Box::new(|s: &mut AchievementState| s.reference_name.clear())),
            ("vendor_id", Box::new(|s: &mut AchievementState| s.vendor_id.clear())),
            ("points", Box::new(|s: &mut AchievementState| s.points = 0)),
        ];

        for (attribute, blank) in cases {
            let (client, resource) = resource();
            let mut config = speedrunner();
            blank(&mut config);

            let err = resource.create(config).await.unwrap_err();
            assert_eq!(err.attribute(), Some(attribute));
            assert!(client.calls().is_empty(), "client called for {}", attribute);
        }
    }

    #[tokio::test]
    async fn test_create_unknown_game_center_is_upstream_error() {
        let (_client, resource) = resource();
        let config = AchievementState {
            game_center_id: "gc-missing".to_string(),
            ..speedrunner()
        };

        let err = resource.create(config).await.unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().starts_with("Failed to read game center"));
    }

    #[tokio::test]
    async fn test_read_overwrites_from_server() {
        let (client, resource) = resource();
        let created = resource.create(speedrunner()).await.unwrap();

        client.edit_achievement(created.id.as_deref().unwrap(), |a| {
            a.points = 50;
            a.reference_name = "Speedrunner (renamed)".to_string();
        });

        let read = resource.read(created.clone()).await.unwrap();
        assert_eq!(read.points, 50);
        assert_eq!(read.reference_name, "Speedrunner (renamed)");
        assert_eq!(read.game_center_id, "gc-1");
        assert_eq!(read.id, created.id);
    }

    #[tokio::test]
    async fn test_read_without_id_is_validation_error() {
        let (client, resource) = resource();
        let err = resource.read(speedrunner()).await.unwrap_err();
        assert_eq!(err.attribute(), Some("id"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_sends_only_mutable_fields() {
        let (client, resource) = resource();
        let created = resource.create(speedrunner()).await.unwrap();

        let planned = AchievementState {
            reference_name: "Speedrunner II".to_string(),
            points: 25,
            repeatable: true,
            show_before_earned: false,
            ..created.clone()
        };
        let updated = resource.update(created.clone(), planned.clone()).await.unwrap();
        assert_eq!(updated, planned);

        let update = client
            .calls()
            .into_iter()
            .find_map(|call| match call {
                Call::UpdateAchievement(update) => Some(update),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            update,
            AchievementUpdate {
                id: created.id.clone().unwrap(),
                reference_name: "Speedrunner II".to_string(),
                points: 25,
                repeatable: true,
                show_before_earned: false,
            }
        );

        let stored = client.achievement(created.id.as_deref().unwrap()).unwrap();
        assert_eq!(stored.vendor_id, "SPEEDRUN_1");
    }

    #[tokio::test]
    async fn test_delete_propagates_client_failure() {
        let (client, resource) = resource();
        let created = resource.create(speedrunner()).await.unwrap();

        client.fail_with(|| ClientError::Api {
            status: 409,
            message: "achievement is live".to_string(),
        });
        let err = resource.delete(created).await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(
            err.to_string(),
            "Failed to delete achievement: API error (409): achievement is live"
        );
    }

    #[tokio::test]
    async fn test_delete_removes_achievement() {
        let (client, resource) = resource();
        let created = resource.create(speedrunner()).await.unwrap();
        let id = created.id.clone().unwrap();

        resource.delete(created).await.unwrap();
        assert!(client.achievement(&id).is_none());
    }

    #[test]
    fn test_state_round_trip_through_json() {
        let state = AchievementState {
            id: Some("a1".to_string()),
            ..speedrunner()
        };
        let value = state.to_value();
        assert_eq!(value["vendor_id"], "SPEEDRUN_1");
        assert_eq!(value["show_before_earned"], true);
        assert_eq!(AchievementState::from_value(&value).unwrap(), state);

        let unknown_id = speedrunner().to_value();
        assert!(unknown_id["id"].is_null());
    }
}
