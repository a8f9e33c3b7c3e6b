//! Provider credentials and their resolution.
//!
//! Each credential is read from the provider configuration first and falls
//! back to an environment variable:
//!
//! | Attribute     | Environment variable |
//! |---------------|----------------------|
//! | `key_id`      | `KEY_ID`             |
//! | `issuer_id`   | `ISSUER_ID`          |
//! | `private_key` | `PRIVATE_KEY`        |
//!
//! Problems are collected as attribute diagnostics so that every missing
//! value is reported at once, before any client is built.

use std::collections::HashMap;

use secrecy::SecretString;
use serde_json::Value;

use crate::schema::Diagnostic;

/// Placeholder a host writes for a value that is not known until apply.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// App Store Connect API key credentials.
///
/// The private key is only reachable through [`secrecy::ExposeSecret`].
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Private key ID, for example `2X9R4HXF34`.
    pub key_id: String,
    /// Issuer ID from the API Keys page.
    pub issuer_id: String,
    /// PEM-encoded private key.
    pub private_key: SecretString,
}

impl Credentials {
    /// Create credentials from explicit values.
    pub fn new(
        key_id: impl Into<String>,
        issuer_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            issuer_id: issuer_id.into(),
            private_key: SecretString::from(private_key.into()),
        }
    }

    /// Resolve credentials from a provider configuration object, falling back
    /// to `env` for attributes that are absent or null.
    ///
    /// Returns every error diagnostic found if any value is unknown or empty.
    pub fn resolve(config: &Value, env: &Environment) -> Result<Self, Vec<Diagnostic>> {
        let fields = [&KEY_ID, &ISSUER_ID, &PRIVATE_KEY];

        let unknown: Vec<Diagnostic> = fields
            .iter()
            .filter(|field| config.get(field.attribute).and_then(Value::as_str) == Some(UNKNOWN_VALUE))
            .map(|field| field.unknown())
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }

        let mut diagnostics = Vec::new();
        let key_id = KEY_ID.value(config, env, &mut diagnostics);
        let issuer_id = ISSUER_ID.value(config, env, &mut diagnostics);
        let private_key = PRIVATE_KEY.value(config, env, &mut diagnostics);

        if diagnostics.is_empty() {
            Ok(Self::new(key_id, issuer_id, private_key))
        } else {
            Err(diagnostics)
        }
    }
}

/// Where environment fallbacks are looked up.
#[derive(Debug, Clone, Default)]
pub enum Environment {
    /// The process environment.
    #[default]
    Process,
    /// A fixed set of variables.
    Fixed(HashMap<String, String>),
}

impl Environment {
    /// An environment backed by the given variables only.
    pub fn fixed<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<String> {
        match self {
            Self::Process => std::env::var(name).ok(),
            Self::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

struct CredentialField {
    attribute: &'static str,
    env_var: &'static str,
    label: &'static str,
}

const KEY_ID: CredentialField = CredentialField {
    attribute: "key_id",
    env_var: "KEY_ID",
    label: "Key ID",
};

const ISSUER_ID: CredentialField = CredentialField {
    attribute: "issuer_id",
    env_var: "ISSUER_ID",
    label: "Issuer ID",
};

const PRIVATE_KEY: CredentialField = CredentialField {
    attribute: "private_key",
    env_var: "PRIVATE_KEY",
    label: "Private Key",
};

impl CredentialField {
    fn value(&self, config: &Value, env: &Environment, diagnostics: &mut Vec<Diagnostic>) -> String {
        let value = match config.get(self.attribute) {
            Some(Value::String(s)) => s.clone(),
            _ => env.get(self.env_var).unwrap_or_default(),
        };
        if value.is_empty() {
            diagnostics.push(self.missing());
        }
        value
    }

    fn unknown(&self) -> Diagnostic {
        Diagnostic::error(format!("Unknown {}", self.label))
            .with_detail(format!(
                "The provider cannot create the App Store Connect API client as there is an unknown \
                 configuration value for the {}. Either apply the source of the value first, set the \
                 value statically in the configuration, or use the {} environment variable.",
                self.label, self.env_var
            ))
            .with_attribute(self.attribute)
    }

    fn missing(&self) -> Diagnostic {
        Diagnostic::error(format!("Missing {}", self.label))
            .with_detail(format!(
                "The provider cannot create the App Store Connect API client as there is a missing \
                 or empty value for the {}. Set the value in the configuration or use the {} \
                 environment variable. If either is already set, ensure the value is not empty.",
                self.label, self.env_var
            ))
            .with_attribute(self.attribute)
    }
}
