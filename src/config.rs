use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_VERSE_BASE_URL: &str = "https://quranapi.pages.dev/api/1";

/// Env keys that may carry the bearer secret, lowest precedence first.
const SECRET_ENV_KEYS: [&str; 2] = ["GATEWAY_SECRET_KEY", "SECRET_KEY"];

/// Runtime configuration.
///
/// Sources, later ones win:
/// - `Config::default()`
/// - `GATEWAY_*` environment variables (e.g. `GATEWAY_LISTEN_ADDR`)
/// - raw `SECRET_KEY` and `DATABASE_URL`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database_url: String,
    /// Shared bearer secret for `/api/accounts`. `None` makes the namespace fail closed.
    #[serde(default, deserialize_with = "opaque_text")]
    pub secret_key: Option<String>,
    pub listen_addr: String,
    pub loglevel: String,
    pub verse_base_url: Url,
    pub verse_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:accounts.db".to_string(),
            secret_key: None,
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            verse_base_url: Url::parse(DEFAULT_VERSE_BASE_URL)
                .expect("default verse base url is valid"),
            verse_timeout_ms: 5_000,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("GATEWAY_"))
            .merge(Env::raw().only(&["SECRET_KEY", "DATABASE_URL"]))
    }

    pub fn load() -> Result<Self, figment::Error> {
        let mut cfg: Config = Self::figment().extract()?;
        // figment types env values ("007" -> 7), so take the secret verbatim.
        if let Some(raw) = SECRET_ENV_KEYS
            .iter()
            .rev()
            .find_map(|key| std::env::var(key).ok())
        {
            cfg.secret_key = Some(raw);
        }
        // An empty secret would let `Bearer ` through.
        if cfg.secret_key.as_deref().is_some_and(|s| s.trim().is_empty()) {
            cfg.secret_key = None;
        }
        Ok(cfg)
    }

    pub fn verse_timeout(&self) -> Duration {
        Duration::from_millis(self.verse_timeout_ms)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

/// Accept any scalar for an opaque text setting and keep it as text.
fn opaque_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|v| match v {
        Scalar::Text(s) => s,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}
