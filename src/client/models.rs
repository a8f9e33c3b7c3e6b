//! Typed App Store Connect entities exchanged with an [`AppStoreConnect`](super::AppStoreConnect) client.

use serde::{Deserialize, Serialize};

/// An app registered in App Store Connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name of the app.
    pub name: String,
    /// Bundle identifier, e.g. `com.example.game`.
    pub bundle_id: String,
    /// Stock keeping unit.
    pub sku: String,
}

/// The Game Center detail record of an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCenter {
    /// Server-assigned identifier.
    pub id: String,
    /// Whether Game Center is enabled for the app on Apple Arcade.
    pub arcade_enabled: bool,
    /// Whether Game Center challenges are enabled.
    pub challenge_enabled: bool,
}

/// A Game Center achievement as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Server-assigned identifier.
    pub id: String,
    /// Internal name of the achievement.
    pub reference_name: String,
    /// Chosen alphanumeric identifier.
    pub vendor_id: String,
    /// Points the achievement is worth.
    pub points: i64,
    /// Whether the achievement can be earned more than once.
    pub repeatable: bool,
    /// Whether the achievement is visible before it is earned.
    pub show_before_earned: bool,
}

/// Attributes for creating an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAchievement {
    /// Internal name of the achievement.
    pub reference_name: String,
    /// Chosen alphanumeric identifier.
    pub vendor_id: String,
    /// Points the achievement is worth.
    pub points: i64,
    /// Whether the achievement can be earned more than once.
    pub repeatable: bool,
    /// Whether the achievement is visible before it is earned.
    pub show_before_earned: bool,
}

/// The mutable attributes of an existing achievement.
///
/// Vendor identifier and game center association are fixed at creation and
/// deliberately have no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementUpdate {
    /// Identifier of the achievement to update.
    pub id: String,
    /// Internal name of the achievement.
    pub reference_name: String,
    /// Points the achievement is worth.
    pub points: i64,
    /// Whether the achievement can be earned more than once.
    pub repeatable: bool,
    /// Whether the achievement is visible before it is earned.
    pub show_before_earned: bool,
}

/// A localized presentation of an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementLocalization {
    /// Server-assigned identifier.
    pub id: String,
    /// Locale code, e.g. `en-US`.
    pub locale: String,
    /// Localized name.
    pub name: String,
    /// Text shown before the achievement is earned.
    pub before_earned_description: String,
    /// Text shown after the achievement is earned.
    pub after_earned_description: String,
}

/// Attributes for creating an achievement localization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAchievementLocalization {
    /// Locale code, e.g. `en-US`.
    pub locale: String,
    /// Localized name.
    pub name: String,
    /// Text shown before the achievement is earned.
    pub before_earned_description: String,
    /// Text shown after the achievement is earned.
    pub after_earned_description: String,
}

/// An image asset uploaded for an achievement localization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementImage {
    /// Server-assigned identifier.
    pub id: String,
    /// Name of the uploaded file.
    pub file_name: String,
    /// Size of the uploaded file in bytes.
    pub file_size: u64,
}
