// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod correlation; // Heatmap des corrélations
pub mod dashboard;   // Jeu de données complet du tableau de bord
pub mod data_point;  // Snapshot du point survolé
pub mod scatter;     // Nuage sentiment × luminosité
pub mod timeseries;  // Série temporelle ventes / prévision

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lumenboard::models::timeseries::TimeSeries;
// On peut faire : use lumenboard::models::TimeSeries;
pub use correlation::{CorrelationMatrix, DEFAULT_METRICS};
pub use dashboard::{AnalysisReport, DashboardData, FeatureImportance};
pub use data_point::DataPoint;
pub use scatter::{RawScatterRecord, ScatterPoint, ScatterSet};
pub use timeseries::{TimeSeries, TimeSeriesPoint, DATE_FORMAT};
