//! `appstore_apps`: list every app visible to the credentials.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::DataSource;
use crate::client::{App, AppStoreConnect};
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};
use crate::state::{Fields, StateRecord};

/// State of an `appstore_apps` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppsData {
    /// Every app, in the order the API returned them.
    pub apps: Vec<App>,
}

impl StateRecord for AppsData {
    fn from_value(value: &Value) -> Result<Self, ProviderError> {
        let fields = Fields::new(value)?;
        let apps = fields
            .list("apps")?
            .iter()
            .map(|item| {
                let app = Fields::new(item)?;
                Ok(App {
                    id: app.string("id")?,
                    name: app.string("name")?,
                    bundle_id: app.string("bundle_id")?,
                    sku: app.string("sku")?,
                })
            })
            .collect::<Result<_, ProviderError>>()?;
        Ok(Self { apps })
    }

    fn to_value(&self) -> Value {
        let apps: Vec<Value> = self
            .apps
            .iter()
            .map(|app| {
                json!({
                    "id": app.id,
                    "name": app.name,
                    "bundle_id": app.bundle_id,
                    "sku": app.sku,
                })
            })
            .collect();
        json!({ "apps": apps })
    }
}

/// Lists apps.
pub struct AppsDataSource<C> {
    client: Arc<C>,
}

impl<C: AppStoreConnect> AppsDataSource<C> {
    /// Create the data source around a configured client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl<C: AppStoreConnect> DataSource for AppsDataSource<C> {
    type State = AppsData;

    const TYPE_NAME: &'static str = "appstore_apps";

    fn schema() -> Schema {
        let app = AttributeType::object([
            ("id", AttributeType::String),
            ("name", AttributeType::String),
            ("bundle_id", AttributeType::String),
            ("sku", AttributeType::String),
        ]);

        Schema::v0()
            .with_description("Use this data source to list all apps.")
            .with_attribute(
                "apps",
                Attribute::new(AttributeType::list(app), AttributeFlags::computed())
                    .with_description("List of apps."),
            )
    }

    #[instrument(skip_all)]
    async fn read(&self, _config: AppsData) -> Result<AppsData, ProviderError> {
        let apps = self
            .client
            .list_apps()
            .await
            .map_err(|e| ProviderError::upstream("Unable to Read Apps", e))?;

        debug!(count = apps.len(), "Listed apps");
        Ok(AppsData { apps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::testing::{Call, MockClient};

    fn app(id: &str, name: &str) -> App {
        App {
            id: id.to_string(),
            name: name.to_string(),
            bundle_id: format!("com.example.{}", name.to_lowercase()),
            sku: name.to_uppercase(),
        }
    }

    #[tokio::test]
    async fn test_read_lists_all_apps() {
        let client = MockClient::new();
        client.add_app(app("app-1", "Dash"));
        client.add_app(app("app-2", "Drift"));
        let source = AppsDataSource::new(Arc::new(client.clone()));

        let data = source.read(AppsData::default()).await.unwrap();
        assert_eq!(data.apps, vec![app("app-1", "Dash"), app("app-2", "Drift")]);
        assert_eq!(client.calls(), vec![Call::ListApps]);

        let value = data.to_value();
        assert_eq!(value["apps"][1]["bundle_id"], "com.example.drift");
        assert_eq!(AppsData::from_value(&value).unwrap(), data);
    }

    #[tokio::test]
    async fn test_read_empty() {
        let source = AppsDataSource::new(Arc::new(MockClient::new()));
        let data = source.read(AppsData::default()).await.unwrap();
        assert!(data.apps.is_empty());
        assert_eq!(data.to_value(), json!({"apps": []}));
    }

    #[tokio::test]
    async fn test_read_failure() {
        let client = MockClient::new();
        client.fail_with(|| ClientError::Unauthorized("expired token".to_string()));
        let source = AppsDataSource::new(Arc::new(client));

        let err = source.read(AppsData::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to Read Apps: unauthorized: expired token"
        );
    }
}
