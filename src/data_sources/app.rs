//! `appstore_app`: look up a single app by identifier.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::instrument;

use super::DataSource;
use crate::client::AppStoreConnect;
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::state::{require, Fields, StateRecord};

/// State of an `appstore_app` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppData {
    /// Identifier of the app to look up.
    pub id: String,
    /// Name of the app.
    pub name: String,
    /// Bundle identifier of the app.
    pub bundle_id: String,
    /// SKU of the app.
    pub sku: String,
}

impl StateRecord for AppData {
    fn from_value(value: &Value) -> Result<Self, ProviderError> {
        let fields = Fields::new(value)?;
        Ok(Self {
            id: fields.string("id")?,
            name: fields.string("name")?,
            bundle_id: fields.string("bundle_id")?,
            sku: fields.string("sku")?,
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "bundle_id": self.bundle_id,
            "sku": self.sku,
        })
    }
}

/// Looks up an app.
pub struct AppDataSource<C> {
    client: Arc<C>,
}

impl<C: AppStoreConnect> AppDataSource<C> {
    /// Create the data source around a configured client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl<C: AppStoreConnect> DataSource for AppDataSource<C> {
    type State = AppData;

    const TYPE_NAME: &'static str = "appstore_app";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("Use this data source to retrieve information about an app.")
            .with_attribute(
                "id",
                Attribute::required_string().with_description("Identifier of the app."),
            )
            .with_attribute(
                "name",
                Attribute::computed_string().with_description("Name of the app."),
            )
            .with_attribute(
                "bundle_id",
                Attribute::computed_string().with_description("Bundle identifier of the app."),
            )
            .with_attribute(
                "sku",
                Attribute::computed_string().with_description("SKU of the app."),
            )
    }

    #[instrument(skip_all, fields(id = %config.id))]
    async fn read(&self, config: AppData) -> Result<AppData, ProviderError> {
        require(&config.id, "id", "read an app")?;

        let app = self
            .client
            .get_app(&config.id)
            .await
            .map_err(|e| ProviderError::upstream("Unable to Read App", e))?;

        Ok(AppData {
            id: app.id,
            name: app.name,
            bundle_id: app.bundle_id,
            sku: app.sku,
        })
    }
}
