//! App Store Connect provider
//!
//! Declarative management of Game Center content in App Store Connect,
//! following the provider model of
//! [terraform-plugin-framework](https://github.com/hashicorp/terraform-plugin-framework).
//!
//! # Overview
//!
//! | Type name                           | Kind        |
//! |-------------------------------------|-------------|
//! | `appstore_achievement`              | resource    |
//! | `appstore_achievement_localization` | resource    |
//! | `appstore_achievement_image`        | resource    |
//! | `appstore_app`                      | data source |
//! | `appstore_apps`                     | data source |
//! | `appstore_game_center`              | data source |
//!
//! Every resource is a small synchronizer: a typed record is built from the
//! host's attribute object, required attributes are checked, one or two
//! [`AppStoreConnect`] calls are made, and the response is projected back.
//!
//! The crate does not speak HTTP. An [`AppStoreConnect`] client is built from
//! resolved [`Credentials`] by the [`Connect`] value handed to
//! [`AppStoreProvider::new`], once, when the provider is configured.
//!
//! # Quick Start
//!
//! ```ignore
//! use appstore_provider::{AppStoreProvider, Credentials, ProviderService};
//! use secrecy::ExposeSecret;
//! use serde_json::json;
//!
//! let provider = AppStoreProvider::new(|credentials: &Credentials| {
//!     HttpClient::new(
//!         &credentials.key_id,
//!         &credentials.issuer_id,
//!         credentials.private_key.expose_secret(),
//!     )
//! });
//!
//! provider.configure(json!({
//!     "key_id": "2X9R4HXF34",
//!     "issuer_id": "57246542-96fe-1a63-e053-0824d011072a",
//! })).await?; // private_key from the PRIVATE_KEY environment variable
//!
//! let state = provider.create("appstore_achievement", json!({
//!     "game_center_id": "gc-1",
//!     "reference_name": "Speedrunner",
//!     "vendor_id": "SPEEDRUN_1",
//!     "points": 100,
//!     "repeatable": false,
//!     "show_before_earned": true,
//! })).await?;
//! ```
//!
//! # Image drift
//!
//! `appstore_achievement_image` stores the MD5 of the uploaded file. When a
//! read finds the local file changed, it clears `file` in state instead of
//! failing, and the next plan replaces the image.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checksum;
pub mod client;
pub mod credentials;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
pub mod state;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::{AppStoreConnect, ClientError, Connect};
pub use credentials::{Credentials, Environment};
pub use error::{DriftDetected, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::AppStoreProvider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, PlanResult, ProviderMetadata};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use secrecy;
pub use serde_json;
pub use tracing;
