// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public
// - "pub use" : re-export, on écrit models::Asset au lieu de models::asset::Asset
// ============================================================================

pub mod asset; // Actif coté et liste classée
pub mod chart; // Historique de prix (7 jours)
pub mod fiat;  // Devises fiat supportées

pub use asset::{format_price, Asset, RankedAssetList};
pub use chart::{ChartPoint, ChartSeries, CHART_WINDOW_DAYS};
pub use fiat::FiatCurrency;
