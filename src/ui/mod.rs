// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Layout principal et routage par onglet
pub mod chart;     // Séries temporelles (ventes, prévision, sentiment)
pub mod scatter;   // Nuage sentiment × luminosité
pub mod heatmap;   // Matrice de corrélation
pub mod insights;  // Panneau narration + historique

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
