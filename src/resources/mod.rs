//! Managed resources.
//!
//! Every resource follows the same synchronizer shape: a typed record comes in,
//! required attributes are checked, one or two client calls are made, and the
//! response is projected back onto the record.

mod achievement;
mod achievement_image;
mod achievement_localization;

pub use achievement::{AchievementResource, AchievementState};
pub use achievement_image::{detect_drift, AchievementImageResource, AchievementImageState};
pub use achievement_localization::{
    AchievementLocalizationResource, AchievementLocalizationState,
};

use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::Schema;
use crate::state::StateRecord;

/// Create/read/update/delete against App Store Connect for one entity type.
#[async_trait::async_trait]
pub trait Resource: Send + Sync + 'static {
    /// The record this resource manages.
    type State: StateRecord;

    /// Fully-qualified type name, e.g. `appstore_achievement`.
    const TYPE_NAME: &'static str;

    /// The resource schema.
    fn schema() -> Schema;

    /// Create the entity and return `config` with its server identifier.
    async fn create(&self, config: Self::State) -> Result<Self::State, ProviderError>;

    /// Refresh `state` from the server's current view.
    async fn read(&self, state: Self::State) -> Result<Self::State, ProviderError>;

    /// Apply an in-place update.
    ///
    /// The default accepts the plan without calling the API.
    async fn update(
        &self,
        prior: Self::State,
        planned: Self::State,
    ) -> Result<Self::State, ProviderError> {
        let _ = prior;
        Ok(planned)
    }

    /// Delete the entity.
    async fn delete(&self, state: Self::State) -> Result<(), ProviderError>;
}

pub(crate) async fn create<R: Resource>(resource: &R, planned: &Value) -> Result<Value, ProviderError> {
    let config = R::State::from_value(planned)?;
    Ok(resource.create(config).await?.to_value())
}

pub(crate) async fn read<R: Resource>(resource: &R, current: &Value) -> Result<Value, ProviderError> {
    let state = R::State::from_value(current)?;
    Ok(resource.read(state).await?.to_value())
}

pub(crate) async fn update<R: Resource>(
    resource: &R,
    prior: &Value,
    planned: &Value,
) -> Result<Value, ProviderError> {
    let prior = R::State::from_value(prior)?;
    let planned = R::State::from_value(planned)?;
    Ok(resource.update(prior, planned).await?.to_value())
}

pub(crate) async fn delete<R: Resource>(resource: &R, current: &Value) -> Result<(), ProviderError> {
    let state = R::State::from_value(current)?;
    resource.delete(state).await
}
