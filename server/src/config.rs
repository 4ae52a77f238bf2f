use std::env;
use std::str::FromStr;
use std::sync::Arc;

use app::client::{DataSource, SupabaseClient, SupabaseConfig};
use app::hooks::ContentHooks;
use shared_utils::RetryConfig;
use tracing::{error, info, warn};

const DEFAULT_OWNER_ID: &str = "1";
const DEFAULT_RETRIES: u32 = 1;
const DEFAULT_RETRY_DELAY_MS: u64 = 200;
const MAX_RETRY_DELAY_SECS: u64 = 2;

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub supabase: Option<SupabaseConfig>,
    pub owner_id: String,
    pub retry: RetryConfig,
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Ignoring unparsable value");
            default
        }),
        None => default,
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let owner_id = lookup("PORTFOLIO_OWNER_ID")
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER_ID.to_owned());
        let retry = RetryConfig::new(
            parse_or(&lookup, "CONTENT_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS),
            MAX_RETRY_DELAY_SECS,
            parse_or(&lookup, "CONTENT_FETCH_RETRIES", DEFAULT_RETRIES),
        );

        Self {
            supabase: SupabaseConfig::from_lookup(&lookup),
            owner_id,
            retry,
        }
    }

    /// Builds the hooks the server functions read through. Without usable
    /// credentials every query is answered from fixtures.
    pub fn content_hooks(&self) -> ContentHooks {
        let source = match &self.supabase {
            Some(config) => match SupabaseClient::new(config) {
                Ok(client) => Some(Arc::new(client) as Arc<dyn DataSource>),
                Err(err) => {
                    error!(%err, "Invalid data service settings");
                    None
                }
            },
            None => None,
        };

        let hooks = ContentHooks::new(source, self.retry, self.owner_id.clone());
        info!(
            mode = ?hooks.data_mode(),
            owner = %self.owner_id,
            retries = self.retry.max_retries,
            "Content data source selected"
        );
        hooks
    }
}
