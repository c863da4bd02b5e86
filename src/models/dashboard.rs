// ============================================================================
// Structure : DashboardData
// ============================================================================
// Tout ce que le tableau de bord affiche, qu'il vienne du générateur mock
// ou de l'API d'analyse. Remplacé en bloc à chaque rechargement.
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CorrelationMatrix, ScatterSet, TimeSeries};

/// Importance d'une variable dans l'explication du modèle (/explain/)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
    /// "positive" ou "negative"
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub description: String,
}

impl FeatureImportance {
    pub fn is_positive(&self) -> bool {
        self.impact.eq_ignore_ascii_case("positive")
    }
}

/// Conclusions d'une analyse de CSV (POST /analyze/)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: Option<String>,
    pub key_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl AnalysisReport {
    /// Vrai si l'analyse n'a rien conclu d'affichable
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.key_factors.is_empty() && self.recommendations.is_empty()
    }
}

/// Jeu de données complet du tableau de bord
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    /// Série temporelle ventes / prévision / sentiment / luminosité
    pub series: TimeSeries,

    /// Nuage sentiment × luminosité
    pub scatter: ScatterSet,

    /// Heatmap des corrélations
    pub correlation: CorrelationMatrix,

    /// Projection future (mode API uniquement) : (date, valeur prévue)
    pub projection: Vec<(NaiveDate, f64)>,

    /// Variables explicatives triées par importance (mode API uniquement)
    pub explanations: Vec<FeatureImportance>,

    /// Résumé textuel de la dernière analyse (mode API uniquement)
    pub summary: Option<String>,

    /// Conclusions de l'upload CSV, quand l'analyse vient de ce poste
    pub report: Option<AnalysisReport>,
}

impl DashboardData {
    /// Vrai si aucune série n'a été chargée
    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.scatter.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_importance_impact() {
        let json = r#"{"feature": "sentiment", "importance": 0.42, "impact": "positive"}"#;
        let feature: FeatureImportance = serde_json::from_str(json).unwrap();

        assert!(feature.is_positive());
        assert!(feature.description.is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(DashboardData::default().is_empty());
        assert!(AnalysisReport::default().is_empty());
    }
}
