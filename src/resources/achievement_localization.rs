//! `appstore_achievement_localization`: localized name and descriptions of an achievement.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::Resource;
use crate::client::{AppStoreConnect, NewAchievementLocalization};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::state::{self, require, require_id, Fields, StateRecord};

/// State of an `appstore_achievement_localization`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AchievementLocalizationState {
    /// Server-assigned identifier, unknown until created.
    pub id: Option<String>,
    /// Achievement the localization belongs to.
    pub achievement_id: String,
    /// Locale code.
    pub locale: String,
    /// Localized name.
    pub name: String,
    /// Text shown before the achievement is earned.
    pub before_earned_description: String,
    /// Text shown after the achievement is earned.
    pub after_earned_description: String,
}

impl StateRecord for AchievementLocalizationState {
    fn from_value(value: &Value) -> Result<Self, ProviderError> {
        let fields = Fields::new(value)?;
        Ok(Self {
            id: fields.optional_string("id")?,
            achievement_id: fields.string("achievement_id")?,
            locale: fields.string("locale")?,
            name: fields.string("name")?,
            before_earned_description: fields.string("before_earned_description")?,
            after_earned_description: fields.string("after_earned_description")?,
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "id": state::optional(&self.id),
            "achievement_id": self.achievement_id,
            "locale": self.locale,
            "name": self.name,
            "before_earned_description": self.before_earned_description,
            "after_earned_description": self.after_earned_description,
        })
    }
}

/// Manages achievement localizations. Updates are accepted without an API call.
pub struct AchievementLocalizationResource<C> {
    client: Arc<C>,
}

impl<C: AppStoreConnect> AchievementLocalizationResource<C> {
    /// Create the resource around a configured client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl<C: AppStoreConnect> Resource for AchievementLocalizationResource<C> {
    type State = AchievementLocalizationState;

    const TYPE_NAME: &'static str = "appstore_achievement_localization";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("Manages game center achievement localization.")
            .with_attribute(
                "id",
                Attribute::computed_string()
                    .with_description("Identifier of the achievement localization.")
                    .with_stable_value(),
            )
            .with_attribute(
                "achievement_id",
                Attribute::required_string().with_description(
                    "Identifier of the achievement to associate the localization with.",
                ),
            )
            .with_attribute(
                "locale",
                Attribute::required_string()
                    .with_description("Locale of the achievement localization."),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_description("Name of the achievement."),
            )
            .with_attribute(
                "before_earned_description",
                Attribute::required_string()
                    .with_description("Description of the achievement before it is earned."),
            )
            .with_attribute(
                "after_earned_description",
                Attribute::required_string()
                    .with_description("Description of the achievement after it is earned."),
            )
    }

    #[instrument(skip_all, fields(achievement_id = %config.achievement_id, locale = %config.locale))]
    async fn create(
        &self,
        config: AchievementLocalizationState,
    ) -> Result<AchievementLocalizationState, ProviderError> {
        const PURPOSE: &str = "create an achievement localization";
        require(&config.achievement_id, "achievement_id", PURPOSE)?;
        require(&config.locale, "locale", PURPOSE)?;
        require(&config.name, "name", PURPOSE)?;
        require(
            &config.before_earned_description,
            "before_earned_description",
            PURPOSE,
        )?;
        require(
            &config.after_earned_description,
            "after_earned_description",
            PURPOSE,
        )?;

        let achievement = self
            .client
            .get_achievement(&config.achievement_id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to read achievement", e))?;

        let localization = self
            .client
            .create_achievement_localization(
                &achievement,
                &NewAchievementLocalization {
                    locale: config.locale.clone(),
                    name: config.name.clone(),
                    before_earned_description: config.before_earned_description.clone(),
                    after_earned_description: config.after_earned_description.clone(),
                },
            )
            .await
            .map_err(|e| ProviderError::upstream("Failed to create achievement localization", e))?;

        debug!(id = %localization.id, "Achievement localization created");
        Ok(AchievementLocalizationState {
            id: Some(localization.id),
            ..config
        })
    }

    #[instrument(skip_all, fields(id = ?state.id))]
    async fn read(
        &self,
        state: AchievementLocalizationState,
    ) -> Result<AchievementLocalizationState, ProviderError> {
        let id = require_id(&state.id, "read an achievement localization")?;

        let localization = self
            .client
            .get_achievement_localization(id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to read achievement localization", e))?;

        Ok(AchievementLocalizationState {
            locale: localization.locale,
            name: localization.name,
            before_earned_description: localization.before_earned_description,
            after_earned_description: localization.after_earned_description,
            ..state
        })
    }

    #[instrument(skip_all, fields(id = ?state.id))]
    async fn delete(&self, state: AchievementLocalizationState) -> Result<(), ProviderError> {
        let id = require_id(&state.id, "delete an achievement localization")?;

        self.client
            .delete_achievement_localization(id)
            .await
            .map_err(|e| ProviderError::upstream("Failed to delete achievement localization", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Achievement;
    use crate::testing::{Call, MockClient};

    fn english() -> AchievementLocalizationState {
        AchievementLocalizationState {
            id: None,
            achievement_id: "ach-1".to_string(),
            locale: "en-US".to_string(),
            name: "Speedrunner".to_string(),
            before_earned_description: "Finish the game in under an hour.".to_string(),
            after_earned_description: "You finished the game in under an hour.".to_string(),
        }
    }

    fn resource() -> (MockClient, AchievementLocalizationResource<MockClient>) {
        let client = MockClient::new();
        client.add_achievement(Achievement {
            id: "ach-1".to_string(),
            reference_name: "Speedrunner".to_string(),
            vendor_id: "SPEEDRUN_1".to_string(),
            points: 100,
            repeatable: false,
            show_before_earned: true,
        });
        (
            client.clone(),
            AchievementLocalizationResource::new(Arc::new(client)),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_server_id() {
        let (client, resource) = resource();

        let created = resource.create(english()).await.unwrap();
        let id = created.id.clone().unwrap();

        assert_eq!(client.localization(&id).unwrap().locale, "en-US");
        assert_eq!(created.name, "Speedrunner");
        assert_eq!(created.achievement_id, "ach-1");
    }

    #[tokio::test]
    async fn test_create_rejects_each_missing_attribute() {
        type Blank = Box<dyn Fn(&mut AchievementLocalizationState)>;
        let cases: Vec<(&str, Blank)> = vec![
            ("achievement_id", Box::new(|s: &mut AchievementLocalizationState| s.achievement_id.clear())),
            ("locale", Box::new(|s: &mut AchievementLocalizationState| s.locale.clear())),
            ("name", Box::new(|s: &mut AchievementLocalizationState| s.name.clear())),
            (
                "before_earned_description",
                Box::new(|s: &mut AchievementLocalizationState| s.before_earned_description.clear()),
            ),
            (
                "after_earned_description",
                Box::new(|s: &mut AchievementLocalizationState| s.after_earned_description.clear()),
            ),
        ];

        for (attribute, blank) in cases {
            let (client, resource) = resource();
            let mut config = english();
            blank(&mut config);

            let err = resource.create(config).await.unwrap_err();
            assert_eq!(err.attribute(), Some(attribute));
            assert!(client.calls().is_empty(), "client called for {}", attribute);
        }
    }

    #[tokio::test]
    async fn test_read_refreshes_fields() {
        let (client, resource) = resource();
        let created = resource.create(english()).await.unwrap();

        client.edit_localization(created.id.as_deref().unwrap(), |l| {
            l.name = "Speed Demon".to_string();
        });

        let read = resource.read(created).await.unwrap();
        assert_eq!(read.name, "Speed Demon");
        assert_eq!(read.achievement_id, "ach-1");
    }

    #[tokio::test]
    async fn test_update_is_accepted_without_api_call() {
        let (client, resource) = resource();
        let created = resource.create(english()).await.unwrap();
        let calls_before = client.calls().len();

        let planned = AchievementLocalizationState {
            name: "Speed Demon".to_string(),
            ..created.clone()
        };
        let updated = resource.update(created, planned.clone()).await.unwrap();

        assert_eq!(updated, planned);
        assert_eq!(client.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_delete() {
        let (client, resource) = resource();
        let created = resource.create(english()).await.unwrap();
        let id = created.id.clone().unwrap();

        resource.delete(created).await.unwrap();

        assert!(client.localization(&id).is_none());
        assert!(client
            .calls()
            .contains(&Call::DeleteAchievementLocalization(id)));
    }
}
