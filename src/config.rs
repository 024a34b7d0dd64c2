// ============================================================================
// Configuration
// ============================================================================
// Pas de fichier de configuration : tout vient de variables d'environnement,
// avec une valeur par défaut pour chacune.
//
//   LAZYSWAP_API_BASE_URL   https://api.coingecko.com/api/v3
//   LAZYSWAP_TIMEOUT_SECS   15
//   LAZYSWAP_DEFAULT_FIAT   USD
//   LAZYSWAP_LOG_DIR        <data_local_dir>/lazyswap/logs
// ============================================================================

use std::env;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::error;

use crate::models::FiatCurrency;

pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Nombre d'actifs demandés au listing (une seule page)
pub const LISTING_PAGE_SIZE: u32 = 150;

/// Lien de don affiché par la touche 'p'
pub const PAYMENT_LINK: &str = "https://paypal.me/sivarajpragasm";

/// Paramètres de l'application
#[derive(Debug, Clone)]
pub struct Config {
    /// URL de base de l'API CoinGecko (sans slash final)
    pub api_base_url: String,

    /// Timeout de chaque requête HTTP
    pub request_timeout: Duration,

    /// Devise sélectionnée au démarrage
    pub default_fiat: FiatCurrency,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Lit la configuration depuis l'environnement
    pub fn from_env() -> Self {
        let api_base_url: String =
            get_env_or_default("LAZYSWAP_API_BASE_URL", DEFAULT_API_BASE_URL.to_string());
        let timeout_secs = get_env_or_default("LAZYSWAP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        let default_fiat = get_env_or_default("LAZYSWAP_DEFAULT_FIAT", FiatCurrency::default());
        let log_dir = get_env_or_none::<PathBuf>("LAZYSWAP_LOG_DIR").unwrap_or_else(default_log_dir);

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
            default_fiat,
            log_dir,
        }
    }

    /// Configuration pointant vers une autre URL (serveur mock en test)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_fiat: FiatCurrency::default(),
            log_dir: default_log_dir(),
        }
    }
}

/// Répertoire de logs par défaut
///
/// - Linux : ~/.local/share/lazyswap/logs
/// - macOS : ~/Library/Application Support/lazyswap/logs
/// - Windows : C:\Users\<user>\AppData\Local\lazyswap\logs
/// - Sinon : ./logs
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyswap").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Lit une variable d'environnement, valeur par défaut si absente ou invalide
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|e| {
            error!(var = env_var, value = %val, error = ?e, "Failed to parse env var, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Lit une variable d'environnement, None si absente ou invalide
pub fn get_env_or_none<T: FromStr>(env_var: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    env::var(env_var).ok().and_then(|val| val.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.default_fiat, FiatCurrency::Usd);
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let config = Config::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_get_env_or_default() {
        env::set_var("LAZYSWAP_TEST_TIMEOUT", "42");
        env::set_var("LAZYSWAP_TEST_BAD", "not-a-number");

        assert_eq!(get_env_or_default("LAZYSWAP_TEST_TIMEOUT", 1u64), 42);
        assert_eq!(get_env_or_default("LAZYSWAP_TEST_BAD", 7u64), 7);
        assert_eq!(get_env_or_default("LAZYSWAP_TEST_MISSING", 3u64), 3);
        assert_eq!(
            get_env_or_default("LAZYSWAP_TEST_MISSING", FiatCurrency::Eur),
            FiatCurrency::Eur
        );
    }
}
