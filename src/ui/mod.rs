// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Rendu du convertisseur
pub mod chart;     // Rendu de la popup graphique
pub mod theme;     // Palettes clair / sombre

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
