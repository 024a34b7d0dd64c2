// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Deux endpoints publics :
//   - /coins/markets              : listing des 150 plus grosses capitalisations
//   - /coins/{id}/market_chart    : historique de prix (7 jours)
//
// CONCEPTS RUST :
// 1. async/await : requêtes non-bloquantes (exécutées par le worker)
// 2. anyhow::Context : message lisible sur chaque erreur
// 3. Serde : désérialisation directe de la réponse JSON
// ============================================================================

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{Config, LISTING_PAGE_SIZE};
use crate::models::{Asset, ChartPoint, ChartSeries, FiatCurrency};

/// Message présenté à l'utilisateur pour toute réponse non-2xx du listing
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait a moment.";

/// Préfixe du message affiché quand CoinGecko est injoignable
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach CoinGecko";

// ============================================================================
// Structures pour parser les réponses JSON
// ============================================================================

/// Une entrée du listing /coins/markets
///
/// CoinGecko renvoie parfois `current_price: null` pour des actifs
/// fraîchement listés, d'où l'Option.
#[derive(Debug, Deserialize)]
struct MarketEntry {
    id: String,
    name: String,
    symbol: String,
    current_price: Option<f64>,
    image: Option<String>,
    market_cap_rank: Option<u32>,
}

/// Réponse de /coins/{id}/market_chart
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP réutilisable pour l'API CoinGecko
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client est un Arc en interne
/// - Le worker clone le client pour chaque tâche async
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Crée un client à partir de la configuration
    pub fn new(config: &Config) -> Result<Self> {
        debug!(base_url = %config.api_base_url, "Creating CoinGecko HTTP client");
        let http = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(config.request_timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Récupère le listing brut pour une devise
    ///
    /// Les entrées sans prix sont ignorées. Le filtrage stablecoins/wrapped
    /// n'est PAS fait ici : c'est le rôle du curateur.
    ///
    /// # Erreurs
    /// * statut non-2xx → RATE_LIMIT_MESSAGE
    /// * erreur réseau → NETWORK_ERROR_MESSAGE suivi de la cause
    /// * JSON invalide → message avec contexte
    #[instrument(skip(self), fields(fiat = %fiat))]
    pub async fn fetch_markets(&self, fiat: FiatCurrency) -> Result<Vec<Asset>> {
        let url = format!("{}/coins/markets", self.base_url);
        let per_page = LISTING_PAGE_SIZE.to_string();
        let vs_currency = fiat.api_code();
        let query = [
            ("vs_currency", vs_currency.as_str()),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("sparkline", "false"),
        ];

        debug!(url = %url, "Sending listing request to CoinGecko");
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .context(NETWORK_ERROR_MESSAGE)?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Toute réponse non-2xx est traitée comme un rate limit
        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status for listing");
            anyhow::bail!(RATE_LIMIT_MESSAGE);
        }

        let entries: Vec<MarketEntry> = response
            .json()
            .await
            .context("Unexpected listing data from CoinGecko")?;

        let assets = parse_market_entries(entries);
        info!(assets = assets.len(), "Successfully fetched market listing");
        Ok(assets)
    }

    /// Récupère l'historique de prix d'un actif sur `days` jours
    #[instrument(skip(self), fields(fiat = %fiat))]
    pub async fn fetch_market_chart(
        &self,
        asset_id: &str,
        fiat: FiatCurrency,
        days: u32,
    ) -> Result<ChartSeries> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, asset_id);
        let days = days.to_string();
        let vs_currency = fiat.api_code();
        let query = [("vs_currency", vs_currency.as_str()), ("days", days.as_str())];

        debug!(url = %url, "Sending market chart request to CoinGecko");
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Échec de la requête HTTP vers CoinGecko")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status for market chart");
            anyhow::bail!("CoinGecko a retourné une erreur : HTTP {}", status);
        }

        let body: MarketChartResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de l'historique CoinGecko")?;

        let series = parse_market_chart(body, asset_id, fiat)?;
        info!(points = series.len(), "Successfully fetched market chart");
        Ok(series)
    }
}

/// Convertit les entrées JSON en Assets, en sautant celles sans prix
fn parse_market_entries(entries: Vec<MarketEntry>) -> Vec<Asset> {
    let total = entries.len();

    let assets: Vec<Asset> = entries
        .into_iter()
        .filter_map(|entry| {
            let current_price = entry.current_price?;
            Some(Asset {
                id: entry.id,
                name: entry.name,
                symbol: entry.symbol,
                current_price,
                image: entry.image,
                market_cap_rank: entry.market_cap_rank,
            })
        })
        .collect();

    let skipped = total - assets.len();
    if skipped > 0 {
        warn!(skipped, total, "Skipped listing entries without a price");
    }

    assets
}

/// Convertit les paires [ms, prix] en ChartSeries ordonnée
fn parse_market_chart(
    body: MarketChartResponse,
    asset_id: &str,
    fiat: FiatCurrency,
) -> Result<ChartSeries> {
    let mut series = ChartSeries::new(asset_id.to_string(), fiat);

    for (millis, price) in body.prices {
        let timestamp = DateTime::from_timestamp_millis(millis as i64)
            .context("Timestamp invalide dans l'historique")?;
        series.push(ChartPoint::new(timestamp, price));
    }

    // L'API renvoie déjà les points dans l'ordre, on le garantit quand même
    series.points.sort_by_key(|p| p.timestamp);
    Ok(series)
}

// ============================================================================
// Tests unitaires
// ============================================================================
// CONCEPT : serveur HTTP local (mockito)
// - Pas d'appel réseau réel, réponses déterministes
// - Vérifie aussi les paramètres de requête envoyés
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> CoinGeckoClient {
        CoinGeckoClient::new(&Config::with_base_url(&server.url())).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_markets_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currency".into(), "eur".into()),
                Matcher::UrlEncoded("order".into(), "market_cap_desc".into()),
                Matcher::UrlEncoded("per_page".into(), "150".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("sparkline".into(), "false".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":"bitcoin","name":"Bitcoin","symbol":"btc","current_price":61000.5,
                     "image":"https://example.com/btc.png","market_cap_rank":1},
                    {"id":"new-coin","name":"New Coin","symbol":"new","current_price":null,
                     "image":null,"market_cap_rank":null},
                    {"id":"ethereum","name":"Ethereum","symbol":"eth","current_price":2400.0,
                     "image":null,"market_cap_rank":2}
                ]"#,
            )
            .create_async()
            .await;

        let assets = client_for(&server)
            .fetch_markets(FiatCurrency::Eur)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[0].current_price, 61000.5);
        assert_eq!(assets[0].image.as_deref(), Some("https://example.com/btc.png"));
        assert_eq!(assets[1].market_cap_rank, Some(2));
    }

    #[tokio::test]
    async fn test_fetch_markets_non_2xx_is_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_markets(FiatCurrency::Usd)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), RATE_LIMIT_MESSAGE);
    }

    #[tokio::test]
    async fn test_fetch_market_chart() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currency".into(), "sgd".into()),
                Matcher::UrlEncoded("days".into(), "7".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "prices": [[1_700_003_600_000u64, 101.5], [1_700_000_000_000u64, 100.0]],
                    "market_caps": [],
                    "total_volumes": []
                })
                .to_string(),
            )
            .create_async()
            .await;

        let series = client_for(&server)
            .fetch_market_chart("bitcoin", FiatCurrency::Sgd, 7)
            .await
            .unwrap();

        assert_eq!(series.asset_id, "bitcoin");
        assert_eq!(series.fiat, FiatCurrency::Sgd);
        assert_eq!(series.len(), 2);
        // Trié par timestamp
        assert_eq!(series.first().unwrap().price, 100.0);
        assert_eq!(series.last().unwrap().price, 101.5);
    }

    #[tokio::test]
    async fn test_fetch_market_chart_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let result = client_for(&server)
            .fetch_market_chart("bitcoin", FiatCurrency::Usd, 7)
            .await;

        assert!(result.is_err());
    }
}
