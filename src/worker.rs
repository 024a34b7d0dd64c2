// ============================================================================
// Background Worker
// ============================================================================
// CONCEPT RUST : Worker async derrière des channels
// - Thread OS dédié qui possède un runtime tokio
// - Reçoit des AppCommand via command_rx (std::sync::mpsc)
// - Chaque commande devient une tâche tokio : un historique lent ne bloque
//   pas un listing
// - Renvoie des AppResult via result_tx, l'UI les applique à son rythme
//
// Le worker ne voit jamais App : il ne fait que des I/O.
// ============================================================================

use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::api::CoinGeckoClient;
use crate::app::{AppCommand, AppResult};

/// Lance le worker et retourne le handle du thread
///
/// Le thread s'arrête quand tous les `Sender<AppCommand>` sont droppés.
///
/// # Arguments
/// * `client` - Client CoinGecko partagé par toutes les tâches
/// * `command_rx` - Receiver des commandes
/// * `result_tx` - Sender des résultats
pub fn spawn_background_worker(
    client: CoinGeckoClient,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let handle = std::thread::Builder::new()
        .name("lazyswap-worker".to_string())
        .spawn(move || {
            // Boucle de traitement des commandes
            // recv() bloque ce thread, pas l'UI
            while let Ok(command) = command_rx.recv() {
                info!(?command, "Worker received command");
                let client = client.clone();
                let result_tx = result_tx.clone();
                runtime.spawn(async move {
                    let result = execute(&client, command).await;
                    // L'UI a pu quitter entre-temps : résultat perdu, sans gravité
                    let _ = result_tx.send(result);
                });
            }
            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du thread worker")?;

    Ok(handle)
}

/// Exécute une commande et la convertit en AppResult
///
/// Les erreurs sont transformées en String avec leur chaîne de causes
/// ("{:#}") : le message du listing est affiché tel quel dans le panneau
/// d'erreur.
pub async fn execute(client: &CoinGeckoClient, command: AppCommand) -> AppResult {
    match command {
        AppCommand::FetchListing { token, fiat } => match client.fetch_markets(fiat).await {
            Ok(assets) => AppResult::ListingLoaded { token, assets },
            Err(e) => {
                error!(fiat = %fiat, error = ?e, "Failed to fetch listing");
                AppResult::ListingFailed {
                    token,
                    error: format!("{:#}", e),
                }
            }
        },

        AppCommand::FetchChart {
            token,
            asset_id,
            fiat,
            days,
        } => match client.fetch_market_chart(&asset_id, fiat, days).await {
            Ok(series) => AppResult::ChartLoaded { token, series },
            Err(e) => {
                error!(asset = %asset_id, fiat = %fiat, error = ?e, "Failed to fetch chart data");
                AppResult::ChartFailed {
                    token,
                    error: format!("{:#}", e),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use mockito::Matcher;

    use crate::api::{NETWORK_ERROR_MESSAGE, RATE_LIMIT_MESSAGE};
    use crate::app::App;
    use crate::config::Config;

    #[tokio::test]
    async fn test_execute_listing_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = CoinGeckoClient::new(&Config::with_base_url(&server.url())).unwrap();
        let mut app = App::default();
        let command = app.start();

        let result = execute(&client, command).await;
        match &result {
            AppResult::ListingFailed { error, .. } => assert_eq!(error, RATE_LIMIT_MESSAGE),
            other => panic!("expected ListingFailed, got {:?}", other),
        }

        app.apply_result(result);
        assert_eq!(app.error.as_deref(), Some(RATE_LIMIT_MESSAGE));
    }

    #[tokio::test]
    async fn test_execute_listing_unreachable_host() {
        // Port libéré juste après le bind : connexion refusée
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client =
            CoinGeckoClient::new(&Config::with_base_url(&format!("http://127.0.0.1:{}", port)))
                .unwrap();
        let mut app = App::default();
        let command = app.start();

        let result = execute(&client, command).await;
        let error = match &result {
            AppResult::ListingFailed { error, .. } => error.clone(),
            other => panic!("expected ListingFailed, got {:?}", other),
        };
        // Le message garde la cause sous-jacente
        assert!(error.starts_with(NETWORK_ERROR_MESSAGE));
        assert!(error.len() > NETWORK_ERROR_MESSAGE.len());

        app.apply_result(result);
        assert!(!app.is_loading);
        assert_eq!(app.error.as_deref(), Some(error.as_str()));
        assert!(app.assets.is_empty());
    }

    #[test]
    fn test_worker_round_trip_through_channels() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":"tether","name":"Tether","symbol":"usdt","current_price":1.0,"image":null,"market_cap_rank":3},
                    {"id":"bitcoin","name":"Bitcoin","symbol":"btc","current_price":60000.0,"image":null,"market_cap_rank":1}]"#,
            )
            .create();

        let client = CoinGeckoClient::new(&Config::with_base_url(&server.url())).unwrap();
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_background_worker(client, command_rx, result_tx).unwrap();

        let mut app = App::default();
        command_tx.send(app.start()).unwrap();

        let result = result_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        app.apply_result(result);

        assert_eq!(app.assets.len(), 1);
        assert_eq!(app.selected_asset().unwrap().id, "bitcoin");

        drop(command_tx);
        handle.join().unwrap();
    }
}
