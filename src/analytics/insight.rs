// ============================================================================
// Générateur d'insights contextuels
// ============================================================================
// Transforme le point survolé en une phrase lisible.
// Les règles sont évaluées dans un ordre FIXE, la première qui s'applique
// gagne :
//   1. ventes + sentiment + luminosité
//   2. réel + prévision
//   3. sentiment seul
//   4. phrase générique
//
// CONCEPT RUST : if let sur des tuples d'Option
// - if let (Some(x), Some(y)) = (a, b) { ... } : tous présents ou rien
// - Chaque bloc = une règle, l'ordre des blocs = la priorité
// ============================================================================

use crate::analytics::format::{format_thousands, whole_number, whole_percent};
use crate::models::{DataPoint, DATE_FORMAT};

/// Phrase générique (aucune règle ne s'applique)
pub const FALLBACK_INSIGHT: &str = "AI analysis reveals significant patterns in your data";

/// Invitation affichée tant que rien n'est survolé
pub const HOVER_PROMPT: &str = "Hover over chart elements to see AI-generated insights";

/// Au-delà de cet écart (%), la performance dépasse les attentes
const VARIANCE_OUTPERFORM: f64 = 5.0;

/// Bandes qualitatives du sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBand {
    /// > 0.7
    HighlyPositive,
    /// > 0.4
    ModeratelyPositive,
    /// <= 0.4
    Neutral,
}

impl SentimentBand {
    pub fn from_score(sentiment: f64) -> Self {
        if sentiment > 0.7 {
            SentimentBand::HighlyPositive
        } else if sentiment > 0.4 {
            SentimentBand::ModeratelyPositive
        } else {
            SentimentBand::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBand::HighlyPositive => "highly positive",
            SentimentBand::ModeratelyPositive => "moderately positive",
            SentimentBand::Neutral => "neutral",
        }
    }

    /// Gain de rétention annoncé pour la bande
    pub fn retention_claim(&self) -> &'static str {
        match self {
            SentimentBand::HighlyPositive => "15-20%",
            SentimentBand::ModeratelyPositive | SentimentBand::Neutral => "5-10%",
        }
    }
}

/// Écart réel vs prévision en %, arrondi à une décimale
///
/// None si la prévision vaut 0 ou si le résultat n'est pas fini
pub fn forecast_variance_percent(actual: f64, forecast: f64) -> Option<f64> {
    if forecast == 0.0 {
        return None;
    }
    let variance = (actual - forecast) / forecast * 100.0;
    if !variance.is_finite() {
        return None;
    }
    let rounded = (variance * 10.0).round() / 10.0;
    // Évite d'afficher "-0.0"
    Some(if rounded == 0.0 { 0.0 } else { rounded })
}

/// Phrase décrivant le point survolé
///
/// `None` et un point vide donnent tous deux la phrase générique.
pub fn contextual_insight(point: Option<&DataPoint>) -> String {
    let Some(point) = point else {
        return FALLBACK_INSIGHT.to_string();
    };

    // Règle 1 : ventes + sentiment + luminosité
    if let (Some(sales), Some(sentiment), Some(brightness)) =
        (point.sales, point.sentiment, point.brightness)
    {
        let when = point
            .date
            .map(|d| format!(" on {}", d.format(DATE_FORMAT)))
            .unwrap_or_default();
        return format!(
            "Sales surge of ${}{} driven by positive sentiment ({}%) and bright visuals ({}% brightness). \
             This combination typically results in 15-25% higher conversion rates.",
            format_thousands(sales),
            when,
            whole_percent(sentiment),
            whole_number(brightness),
        );
    }

    // Règle 2 : réel + prévision
    if let (Some(actual), Some(forecast)) = (point.actual, point.forecast) {
        if let Some(variance) = forecast_variance_percent(actual, forecast) {
            let sign = if variance > 0.0 { "+" } else { "" };
            let verdict = if variance > VARIANCE_OUTPERFORM {
                "Higher than expected performance suggests strong market conditions."
            } else {
                "Performance aligns closely with predictions."
            };
            return format!(
                "Forecast accuracy: {}{:.1}% variance. {}",
                sign, variance, verdict
            );
        }
    }

    // Règle 3 : sentiment seul
    if let Some(sentiment) = point.sentiment {
        let band = SentimentBand::from_score(sentiment);
        return format!(
            "Sentiment score of {}% indicates {} customer engagement. \
             This level typically correlates with {} higher retention rates.",
            whole_percent(sentiment),
            band.label(),
            band.retention_claim(),
        );
    }

    // Règle 4 : rien d'exploitable
    FALLBACK_INSIGHT.to_string()
}

// ============================================================================
// Tests unitaires
// ============================================================================
