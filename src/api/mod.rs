// ============================================================================
// Module : api
// ============================================================================
// Clients HTTP vers les sources de données de marché (CoinGecko)
// ============================================================================

pub mod coingecko;  // Client API CoinGecko

// Re-export du client et du message d'erreur du listing
pub use coingecko::{CoinGeckoClient, NETWORK_ERROR_MESSAGE, RATE_LIMIT_MESSAGE};
