// ============================================================================
// Module : api
// ============================================================================
// Sources de données du tableau de bord :
// - client : API d'analyse distante (analyse, prévision, explications)
// - mock : générateur local pour le mode démo et le mode live
// ============================================================================

pub mod client; // Client HTTP de l'API d'analyse
pub mod error;  // Statuts HTTP typés (401, 402, 429)
pub mod mock;   // Données simulées

// Re-export des types principaux
pub use client::{AnalysisClient, ForecastData, TokenStatus};
pub use error::ApiError;
