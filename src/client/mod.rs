//! The App Store Connect client seam.
//!
//! The provider never talks HTTP itself. It is handed a value implementing
//! [`Connect`] which, once credentials have been resolved, builds a client
//! implementing [`AppStoreConnect`]. That client is shared read-only by every
//! resource and data source for the rest of the process.

mod models;

pub use models::{
    Achievement, AchievementImage, AchievementLocalization, AchievementUpdate, App, GameCenter,
    NewAchievement, NewAchievementLocalization,
};

use thiserror::Error;

use crate::credentials::Credentials;

/// Errors returned by an App Store Connect client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API rejected the request's credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API answered with an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error detail reported by the API.
        message: String,
    },

    /// The request never reached the API or the response was unreadable.
    #[error("transport error: {0}")]
    Transport(String),

    /// An authentication token could not be issued from the credentials.
    #[error("token error: {0}")]
    Auth(String),
}

/// Operations the provider consumes from App Store Connect.
///
/// Implementations must be safe to share across concurrently running
/// operations; the provider never mutates a client after construction.
#[async_trait::async_trait]
pub trait AppStoreConnect: Send + Sync + 'static {
    // =========================================================================
    // Apps & Game Center
    // =========================================================================

    /// Fetch an app by identifier.
    async fn get_app(&self, id: &str) -> Result<App, ClientError>;

    /// List every app visible to the credentials.
    async fn list_apps(&self) -> Result<Vec<App>, ClientError>;

    /// Fetch the Game Center detail of an app.
    async fn get_game_center(&self, app: &App) -> Result<GameCenter, ClientError>;

    /// Fetch a Game Center detail by its own identifier.
    async fn get_game_center_by_id(&self, id: &str) -> Result<GameCenter, ClientError>;

    // =========================================================================
    // Achievements
    // =========================================================================

    /// Fetch an achievement by identifier.
    async fn get_achievement(&self, id: &str) -> Result<Achievement, ClientError>;

    /// Create an achievement under a game center.
    async fn create_achievement(
        &self,
        game_center: &GameCenter,
        achievement: &NewAchievement,
    ) -> Result<Achievement, ClientError>;

    /// Update the mutable attributes of an achievement.
    async fn update_achievement(
        &self,
        update: &AchievementUpdate,
    ) -> Result<Achievement, ClientError>;

    /// Delete an achievement.
    async fn delete_achievement(&self, id: &str) -> Result<(), ClientError>;

    // =========================================================================
    // Achievement localizations & images
    // =========================================================================

    /// Fetch an achievement localization by identifier.
    async fn get_achievement_localization(
        &self,
        id: &str,
    ) -> Result<AchievementLocalization, ClientError>;

    /// Create a localization for an achievement.
    async fn create_achievement_localization(
        &self,
        achievement: &Achievement,
        localization: &NewAchievementLocalization,
    ) -> Result<AchievementLocalization, ClientError>;

    /// Delete an achievement localization.
    async fn delete_achievement_localization(&self, id: &str) -> Result<(), ClientError>;

    /// Fetch an achievement image by identifier.
    async fn get_achievement_image(&self, id: &str) -> Result<AchievementImage, ClientError>;

    /// Upload an image for an achievement localization.
    async fn create_achievement_image(
        &self,
        localization: &AchievementLocalization,
        file_name: &str,
        data: &[u8],
    ) -> Result<AchievementImage, ClientError>;

    /// Delete an achievement image.
    async fn delete_achievement_image(&self, id: &str) -> Result<(), ClientError>;
}

/// Builds an [`AppStoreConnect`] client from resolved credentials.
///
/// Called once, from `configure`. Any closure of the right shape is a
/// `Connect`:
///
/// ```ignore
/// use secrecy::ExposeSecret;
///
/// let provider = AppStoreProvider::new(|credentials: &Credentials| {
///     HttpClient::new(
///         &credentials.key_id,
///         &credentials.issuer_id,
///         credentials.private_key.expose_secret(),
///     )
/// });
/// ```
pub trait Connect: Send + Sync + 'static {
    /// The client type produced.
    type Client: AppStoreConnect;

    /// Build a client, issuing whatever token source it needs.
    fn connect(&self, credentials: &Credentials) -> Result<Self::Client, ClientError>;
}

impl<F, C> Connect for F
where
    F: Fn(&Credentials) -> Result<C, ClientError> + Send + Sync + 'static,
    C: AppStoreConnect,
{
    type Client = C;

    fn connect(&self, credentials: &Credentials) -> Result<C, ClientError> {
        self(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::NotFound("achievement 42".to_string());
        assert_eq!(err.to_string(), "not found: achievement 42");

        let err = ClientError::Api {
            status: 409,
            message: "vendor id already used".to_string(),
        };
        assert_eq!(err.to_string(), "API error (409): vendor id already used");

        let err = ClientError::Auth("invalid PEM".to_string());
        assert_eq!(err.to_string(), "token error: invalid PEM");
    }
}
