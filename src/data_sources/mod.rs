//! Read-only lookups.
//!
//! A data source takes its configuration as a typed record, performs one or
//! two client reads, and returns the record with the computed attributes
//! filled in.

mod app;
mod apps;
mod game_center;

pub use app::{AppData, AppDataSource};
pub use apps::{AppsData, AppsDataSource};
pub use game_center::{GameCenterData, GameCenterDataSource};

use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::Schema;
use crate::state::StateRecord;

/// A read-only lookup against App Store Connect.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// The record this data source produces.
    type State: StateRecord;

    /// Fully-qualified type name, e.g. `appstore_app`.
    const TYPE_NAME: &'static str;

    /// The data source schema.
    fn schema() -> Schema;

    /// Resolve `config` into the full record.
    async fn read(&self, config: Self::State) -> Result<Self::State, ProviderError>;
}

pub(crate) async fn read<D: DataSource>(source: &D, config: &Value) -> Result<Value, ProviderError> {
    let config = D::State::from_value(config)?;
    Ok(source.read(config).await?.to_value())
}
