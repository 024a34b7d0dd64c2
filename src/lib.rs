// ============================================================================
// LazySwap - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client CoinGecko
pub mod app;       // État de l'application
pub mod config;    // Configuration (variables d'environnement)
pub mod converter; // Conversion fiat → crypto
pub mod curator;   // Filtrage et classement des actifs
pub mod handler;   // Touches → transitions de App
pub mod models;    // Structures de données
pub mod ui;        // Interface utilisateur
pub mod worker;    // Thread de fetch en arrière-plan
