// ============================================================================
// Résumés du nuage de points et de la heatmap
// ============================================================================

use crate::models::{ScatterPoint, ScatterSet};

/// Seuil "visuel lumineux" (luminosité, en %)
pub const BRIGHT_THRESHOLD: f64 = 70.0;

/// Seuil "sentiment positif"
pub const POSITIVE_THRESHOLD: f64 = 0.8;

fn is_bright(point: &ScatterPoint) -> bool {
    point.brightness >= BRIGHT_THRESHOLD
}

fn is_positive(point: &ScatterPoint) -> bool {
    point.sentiment >= POSITIVE_THRESHOLD
}

/// Phrase résumant où se trouvent les meilleures ventes
///
/// Repère le point aux ventes maximales puis compte les points du segment
/// "lumineux ET positif".
pub fn scatter_summary(set: &ScatterSet) -> String {
    let Some(top) = set.top_sales() else {
        return "No data available to summarize.".to_string();
    };

    let aligned = set
        .points
        .iter()
        .filter(|p| is_bright(p) && is_positive(p))
        .count();

    let segment = if aligned > 1 {
        format!("{} points also align", aligned)
    } else {
        "This pattern recurs across samples".to_string()
    };

    format!(
        "Highest sales observed at brightness {} 70 and sentiment {} 0.8. {}.",
        if is_bright(top) { ">" } else { "<=" },
        if is_positive(top) { ">" } else { "<=" },
        segment
    )
}

/// Descripteur court affiché sous le détail d'un point du nuage
pub fn tooltip_descriptor(point: &ScatterPoint) -> &'static str {
    match (is_positive(point), is_bright(point)) {
        (true, true) => "Positive sentiment and high brightness → higher sales",
        (true, false) => "Positive sentiment → uplift in sales",
        (false, true) => "Bright visuals → increased engagement",
        (false, false) => "Neutral conditions",
    }
}

/// Intensité d'une corrélation (cellule de heatmap)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    /// |r| > 0.7 forte, > 0.4 modérée, sinon faible
    pub fn from_value(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude > 0.7 {
            CorrelationStrength::Strong
        } else if magnitude > 0.4 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "Strong",
            CorrelationStrength::Moderate => "Moderate",
            CorrelationStrength::Weak => "Weak",
        }
    }
}
