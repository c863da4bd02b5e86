// ============================================================================
// Narration des graphiques
// ============================================================================
// Chaque onglet affiche un titre et un paragraphe "généré par l'IA" au-dessus
// de son graphique. Le texte s'adapte au point survolé quand il contient la
// mesure utile à ce graphique, sinon on affiche une description générique.
// ============================================================================

use crate::analytics::format::whole_number;
use crate::analytics::insight::SentimentBand;
use crate::models::DataPoint;

/// Graphique narré
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Sales,
    Sentiment,
    Visual,
    Correlation,
    Forecast,
}

/// Titre + paragraphe affichés au-dessus d'un graphique
#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    pub title: &'static str,
    pub content: String,
}

/// Précision de prévision (%) quand rien n'est survolé
const DEFAULT_ACCURACY: f64 = 91.0;

impl ChartKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Sales => "Sales Performance Analysis",
            ChartKind::Sentiment => "Sentiment Intelligence",
            ChartKind::Visual => "Visual Impact Assessment",
            ChartKind::Correlation => "Multi-Modal Correlation",
            ChartKind::Forecast => "Predictive Analytics",
        }
    }

    fn generic_content(&self) -> &'static str {
        match self {
            ChartKind::Sales => {
                "Sales performance analysis reveals consistent growth patterns with forecast accuracy \
                 maintaining 91% reliability. Seasonal trends and campaign effectiveness drive performance metrics."
            }
            ChartKind::Sentiment => {
                "Sentiment analysis reveals customer engagement patterns and emotional responses to marketing \
                 campaigns. Positive sentiment correlates with higher conversion rates and brand loyalty."
            }
            ChartKind::Visual => {
                "Visual element analysis shows how image characteristics, color schemes, and brightness levels \
                 influence customer perception and purchasing decisions."
            }
            ChartKind::Correlation => {
                "Multi-modal correlation analysis reveals hidden patterns between sales data, customer sentiment, \
                 and visual marketing elements. This integrated approach provides deeper business insights."
            }
            ChartKind::Forecast => {
                "Predictive analytics utilize advanced machine learning models to forecast future performance \
                 based on historical data, sentiment patterns, and visual marketing effectiveness."
            }
        }
    }
}

/// Tendance déduite de l'écart réel / prévision ("positive" par défaut)
fn trend_label(point: &DataPoint) -> &'static str {
    match (point.actual, point.forecast) {
        (Some(actual), Some(forecast)) if actual < forecast => "negative",
        _ => "positive",
    }
}

/// Précision de prévision en % : 100 - |écart|, jamais négative
fn forecast_accuracy(point: &DataPoint) -> Option<f64> {
    let (actual, forecast) = (point.actual?, point.forecast?);
    if forecast == 0.0 {
        return None;
    }
    let variance = ((actual - forecast) / forecast * 100.0).abs();
    Some((100.0 - variance).max(0.0))
}

/// Construit la narration d'un graphique
pub fn narrate(kind: ChartKind, point: Option<&DataPoint>) -> Narration {
    let content = point
        .and_then(|p| contextual_content(kind, p))
        .unwrap_or_else(|| kind.generic_content().to_string());

    Narration {
        title: kind.title(),
        content,
    }
}

/// Texte adapté au point, None si la mesure utile manque
fn contextual_content(kind: ChartKind, point: &DataPoint) -> Option<String> {
    match kind {
        ChartKind::Sales => Some(format!(
            "Forecast accuracy remains stable at 91%, with minor volatility driven by ad campaign brightness \
             variations. Recent performance shows a {} trajectory with seasonal patterns indicating strong \
             market positioning.",
            trend_label(point)
        )),
        ChartKind::Sentiment => {
            let sentiment = point.sentiment?;
            let band = SentimentBand::from_score(sentiment);
            Some(format!(
                "Customer sentiment analysis shows {} engagement levels at {}%. \
                 This correlates with {} higher retention rates.",
                band.label(),
                whole_number(sentiment * 100.0),
                band.retention_claim()
            ))
        }
        ChartKind::Visual => {
            let brightness = point.brightness?;
            let level = if brightness > 70.0 {
                "high brightness"
            } else if brightness > 40.0 {
                "moderate brightness"
            } else {
                "low brightness"
            };
            Some(format!(
                "Visual analysis indicates {} levels at {}%. Color psychology and visual appeal significantly \
                 impact customer engagement and conversion rates.",
                level,
                whole_number(brightness)
            ))
        }
        ChartKind::Correlation => {
            let correlation = point.correlation?;
            let strength = if correlation > 0.7 {
                "strong"
            } else if correlation > 0.4 {
                "moderate"
            } else {
                "weak"
            };
            Some(format!(
                "Cross-modal analysis reveals {} correlations between sales performance, sentiment scores, and \
                 visual elements. Integrated insights provide comprehensive business intelligence.",
                strength
            ))
        }
        ChartKind::Forecast => {
            let accuracy = forecast_accuracy(point).unwrap_or(DEFAULT_ACCURACY);
            let level = if accuracy > 90.0 {
                "high"
            } else if accuracy > 80.0 {
                "moderate"
            } else {
                "variable"
            };
            Some(format!(
                "Forecasting models show {} accuracy at {}%. Predictive trends indicate {} market conditions \
                 with seasonal adjustments.",
                level,
                whole_number(accuracy),
                trend_label(point)
            ))
        }
    }
}
