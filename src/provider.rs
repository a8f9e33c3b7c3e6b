//! The App Store Connect provider.
//!
//! [`AppStoreProvider`] resolves credentials, builds the client once through
//! its [`Connect`] implementation, and dispatches every operation to the
//! resource or data source named by the host.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{AppStoreConnect, Connect};
use crate::credentials::{Credentials, Environment};
use crate::data_sources::{
    self, AppDataSource, AppsDataSource, DataSource, GameCenterDataSource,
};
use crate::error::ProviderError;
use crate::plan::plan;
use crate::resources::{
    self, AchievementImageResource, AchievementLocalizationResource, AchievementResource,
    Resource,
};
use crate::schema::{Attribute, Diagnostic, ProviderSchema, Schema};
use crate::service::ProviderService;
use crate::types::{PlanResult, ProviderMetadata};
use crate::validation::validate;

/// Provider type name, the prefix of every resource and data source.
pub const TYPE_NAME: &str = "appstore";

/// Everything that needs the configured client.
struct Registry<C> {
    achievement: AchievementResource<C>,
    localization: AchievementLocalizationResource<C>,
    image: AchievementImageResource<C>,
    app: AppDataSource<C>,
    apps: AppsDataSource<C>,
    game_center: GameCenterDataSource<C>,
}

impl<C: AppStoreConnect> Registry<C> {
    fn new(client: C) -> Self {
        let client = Arc::new(client);
        Self {
            achievement: AchievementResource::new(client.clone()),
            localization: AchievementLocalizationResource::new(client.clone()),
            image: AchievementImageResource::new(client.clone()),
            app: AppDataSource::new(client.clone()),
            apps: AppsDataSource::new(client.clone()),
            game_center: GameCenterDataSource::new(client),
        }
    }
}

enum ResourceKind {
    Achievement,
    Localization,
    Image,
}

enum DataSourceKind {
    App,
    Apps,
    GameCenter,
}

/// Terraform-style provider for App Store Connect Game Center content.
pub struct AppStoreProvider<F: Connect> {
    connect: F,
    environment: Environment,
    registry: OnceLock<Registry<F::Client>>,
}

impl<F: Connect> AppStoreProvider<F> {
    /// Create a provider that builds its client with `connect`, falling back
    /// to the process environment for credentials.
    pub fn new(connect: F) -> Self {
        Self::with_environment(connect, Environment::Process)
    }

    /// Create a provider that reads credential fallbacks from `environment`.
    pub fn with_environment(connect: F, environment: Environment) -> Self {
        Self {
            connect,
            environment,
            registry: OnceLock::new(),
        }
    }

    /// Whether `configure` has succeeded.
    pub fn is_configured(&self) -> bool {
        self.registry.get().is_some()
    }

    fn registry(&self) -> Result<&Registry<F::Client>, ProviderError> {
        self.registry.get().ok_or_else(|| {
            ProviderError::Configuration("provider has not been configured".to_string())
        })
    }

    fn provider_schema() -> Schema {
        Schema::v0()
            .with_description("Interact with App Store Connect.")
            .with_attribute(
                "key_id",
                Attribute::optional_string().with_description(
                    "Private key ID from App Store Connect, for example, 2X9R4HXF34. \
                     May also be provided via the KEY_ID environment variable.",
                ),
            )
            .with_attribute(
                "issuer_id",
                Attribute::optional_string().with_description(
                    "Issuer ID from the API Keys page in App Store Connect, for example, \
                     57246542-96fe-1a63-e053-0824d011072a. \
                     May also be provided via the ISSUER_ID environment variable.",
                ),
            )
            .with_attribute(
                "private_key",
                Attribute::optional_string()
                    .with_description(
                        "PEM-encoded private key from App Store Connect. \
                         Keep your API keys secure and private. \
                         May also be provided via the PRIVATE_KEY environment variable.",
                    )
                    .sensitive(),
            )
    }

    fn resource_kind(resource_type: &str) -> Result<ResourceKind, ProviderError> {
        if resource_type == AchievementResource::<F::Client>::TYPE_NAME {
            Ok(ResourceKind::Achievement)
        } else if resource_type == AchievementLocalizationResource::<F::Client>::TYPE_NAME {
            Ok(ResourceKind::Localization)
        } else if resource_type == AchievementImageResource::<F::Client>::TYPE_NAME {
            Ok(ResourceKind::Image)
        } else {
            Err(ProviderError::UnknownResource(resource_type.to_string()))
        }
    }

    fn data_source_kind(data_source_type: &str) -> Result<DataSourceKind, ProviderError> {
        if data_source_type == AppDataSource::<F::Client>::TYPE_NAME {
            Ok(DataSourceKind::App)
        } else if data_source_type == AppsDataSource::<F::Client>::TYPE_NAME {
            Ok(DataSourceKind::Apps)
        } else if data_source_type == GameCenterDataSource::<F::Client>::TYPE_NAME {
            Ok(DataSourceKind::GameCenter)
        } else {
            Err(ProviderError::UnknownResource(data_source_type.to_string()))
        }
    }

    fn resource_schema(resource_type: &str) -> Result<Schema, ProviderError> {
        Ok(match Self::resource_kind(resource_type)? {
            ResourceKind::Achievement => AchievementResource::<F::Client>::schema(),
            ResourceKind::Localization => AchievementLocalizationResource::<F::Client>::schema(),
            ResourceKind::Image => AchievementImageResource::<F::Client>::schema(),
        })
    }
}

#[async_trait::async_trait]
impl<F: Connect> ProviderService for AppStoreProvider<F> {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::new()
            .with_provider_config(Self::provider_schema())
            .with_resource(
                AchievementResource::<F::Client>::TYPE_NAME,
                AchievementResource::<F::Client>::schema(),
            )
            .with_resource(
                AchievementLocalizationResource::<F::Client>::TYPE_NAME,
                AchievementLocalizationResource::<F::Client>::schema(),
            )
            .with_resource(
                AchievementImageResource::<F::Client>::TYPE_NAME,
                AchievementImageResource::<F::Client>::schema(),
            )
            .with_data_source(
                AppDataSource::<F::Client>::TYPE_NAME,
                AppDataSource::<F::Client>::schema(),
            )
            .with_data_source(
                AppsDataSource::<F::Client>::TYPE_NAME,
                AppsDataSource::<F::Client>::schema(),
            )
            .with_data_source(
                GameCenterDataSource::<F::Client>::TYPE_NAME,
                GameCenterDataSource::<F::Client>::schema(),
            )
    }

    fn metadata(&self) -> ProviderMetadata {
        let schema = self.schema();
        let mut resources: Vec<String> = schema.resources.into_keys().collect();
        let mut data_sources: Vec<String> = schema.data_sources.into_keys().collect();
        resources.sort();
        data_sources.sort();
        ProviderMetadata {
            type_name: TYPE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resources,
            data_sources,
        }
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        if self.is_configured() {
            return Err(ProviderError::Configuration(
                "provider is already configured".to_string(),
            ));
        }

        info!("Configuring App Store Connect API client");

        let diagnostics = validate(&Self::provider_schema(), &config);
        if !diagnostics.is_empty() {
            return Ok(diagnostics);
        }

        let credentials = match Credentials::resolve(&config, &self.environment) {
            Ok(credentials) => credentials,
            Err(diagnostics) => return Ok(diagnostics),
        };

        debug!(?credentials, "Creating App Store Connect API client");

        let client = match self.connect.connect(&credentials) {
            Ok(client) => client,
            Err(e) => {
                return Ok(vec![Diagnostic::error(
                    "Failed to create App Store Connect API client",
                )
                .with_detail(format!(
                    "An unexpected error occurred when creating the App Store Connect API client.\n\n\
                     App Store Connect Client Error: {}",
                    e
                ))]);
            }
        };

        if self.registry.set(Registry::new(client)).is_err() {
            return Err(ProviderError::Configuration(
                "provider is already configured".to_string(),
            ));
        }

        info!("Configured App Store Connect API client");
        Ok(vec![])
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        let schema = Self::resource_schema(resource_type)?;
        Ok(plan(&schema, prior_state.as_ref(), &proposed_state))
    }

    #[instrument(skip(self, planned_state))]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let kind = Self::resource_kind(resource_type)?;
        let registry = self.registry()?;
        match kind {
            ResourceKind::Achievement => resources::create(&registry.achievement, &planned_state).await,
            ResourceKind::Localization => resources::create(&registry.localization, &planned_state).await,
            ResourceKind::Image => resources::create(&registry.image, &planned_state).await,
        }
    }

    #[instrument(skip(self, current_state))]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let kind = Self::resource_kind(resource_type)?;
        let registry = self.registry()?;
        match kind {
            ResourceKind::Achievement => resources::read(&registry.achievement, &current_state).await,
            ResourceKind::Localization => resources::read(&registry.localization, &current_state).await,
            ResourceKind::Image => resources::read(&registry.image, &current_state).await,
        }
    }

    #[instrument(skip(self, prior_state, planned_state))]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let kind = Self::resource_kind(resource_type)?;
        let registry = self.registry()?;
        match kind {
            ResourceKind::Achievement => {
                resources::update(&registry.achievement, &prior_state, &planned_state).await
            }
            ResourceKind::Localization => {
                resources::update(&registry.localization, &prior_state, &planned_state).await
            }
            ResourceKind::Image => {
                resources::update(&registry.image, &prior_state, &planned_state).await
            }
        }
    }

    #[instrument(skip(self, current_state))]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let kind = Self::resource_kind(resource_type)?;
        let registry = self.registry()?;
        match kind {
            ResourceKind::Achievement => resources::delete(&registry.achievement, &current_state).await,
            ResourceKind::Localization => resources::delete(&registry.localization, &current_state).await,
            ResourceKind::Image => resources::delete(&registry.image, &current_state).await,
        }
    }

    #[instrument(skip(self, config))]
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let kind = Self::data_source_kind(data_source_type)?;
        let registry = self.registry()?;
        match kind {
            DataSourceKind::App => data_sources::read(&registry.app, &config).await,
            DataSourceKind::Apps => data_sources::read(&registry.apps, &config).await,
            DataSourceKind::GameCenter => data_sources::read(&registry.game_center, &config).await,
        }
    }
}
