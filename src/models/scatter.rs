// ============================================================================
// Structure : ScatterPoint / ScatterSet
// ============================================================================
// Nuage de points multimodal : sentiment (X) × luminosité (Y) × ventes
// (taille) × variance de prévision (couleur)
//
// CONCEPTS RUST :
// 1. Deux types : RawScatterRecord (JSON brut, champs optionnels) et
//    ScatterPoint (validé, tous les champs présents)
// 2. filter_map : conversion + filtrage en un seul passage
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::DataPoint;

/// Point du nuage, validé (aucun NaN)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Score de sentiment [0, 1]
    pub sentiment: f64,
    /// Luminosité [0, 100]
    pub brightness: f64,
    /// Ventes (>= 0)
    pub sales: f64,
    /// Variance de prévision signée, typiquement [-0.3, 0.3]
    pub variance: f64,
}

impl ScatterPoint {
    pub fn new(sentiment: f64, brightness: f64, sales: f64, variance: f64) -> Self {
        Self {
            sentiment,
            brightness,
            sales,
            variance,
        }
    }

    /// Snapshot pour le générateur d'insights
    pub fn to_data_point(&self) -> DataPoint {
        DataPoint::new()
            .with_sentiment(self.sentiment)
            .with_brightness(self.brightness)
            .with_sales(self.sales)
            .with_variance(self.variance)
    }
}

/// Enregistrement brut tel que renvoyé par l'API (champs manquants possibles)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScatterRecord {
    pub sentiment: Option<f64>,
    pub brightness: Option<f64>,
    pub sales: Option<f64>,
    pub variance: Option<f64>,
}

/// Collection de points du nuage (non ordonnée)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterSet {
    pub points: Vec<ScatterPoint>,
}

impl ScatterSet {
    pub fn new(points: Vec<ScatterPoint>) -> Self {
        Self { points }
    }

    /// Prépare les enregistrements bruts avant tout calcul
    ///
    /// CONCEPT : Sanitization côté appelant
    /// - Un champ absent vaut 0
    /// - Les points dont le sentiment ou la luminosité n'est pas fini sont
    ///   écartés (ils casseraient la régression)
    /// - Ventes et variance non finies sont ramenées à 0
    pub fn prepare(records: &[RawScatterRecord]) -> Self {
        let points = records
            .iter()
            .filter_map(|r| {
                let sentiment = r.sentiment.unwrap_or(0.0);
                let brightness = r.brightness.unwrap_or(0.0);
                if !sentiment.is_finite() || !brightness.is_finite() {
                    return None;
                }
                Some(ScatterPoint::new(
                    sentiment,
                    brightness,
                    finite_or_zero(r.sales),
                    finite_or_zero(r.variance),
                ))
            })
            .collect();

        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Paires (sentiment, luminosité) pour la régression et le rendu
    pub fn sentiment_brightness_pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.sentiment, p.brightness)).collect()
    }

    /// Point ayant les ventes les plus élevées
    ///
    /// En cas d'égalité, le dernier point l'emporte (max_by garde le dernier)
    pub fn top_sales(&self) -> Option<&ScatterPoint> {
        self.points.iter().max_by(|a, b| a.sales.total_cmp(&b.sales))
    }

    /// Domaine des ventes (min, max) pour la taille des bulles
    ///
    /// Un min nul retombe sur 0 et un max nul sur 1
    pub fn sales_domain(&self) -> (f64, f64) {
        if self.points.is_empty() {
            return (0.0, 1.0);
        }
        let (min, max) = self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), p| (min.min(p.sales), max.max(p.sales)),
        );
        (min, if max == 0.0 { 1.0 } else { max })
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_drops_non_finite_axes() {
        let records = vec![
            RawScatterRecord {
                sentiment: Some(0.5),
                brightness: Some(60.0),
                sales: Some(1200.0),
                variance: Some(0.1),
            },
            RawScatterRecord {
                sentiment: Some(f64::NAN),
                brightness: Some(60.0),
                ..RawScatterRecord::default()
            },
            RawScatterRecord {
                sentiment: Some(0.2),
                brightness: None,
                sales: Some(f64::NAN),
                variance: None,
            },
        ];

        let set = ScatterSet::prepare(&records);
        assert_eq!(set.len(), 2);
        assert_eq!(set.points[1], ScatterPoint::new(0.2, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_top_sales_last_wins_on_tie() {
        let set = ScatterSet::new(vec![
            ScatterPoint::new(0.1, 10.0, 500.0, 0.0),
            ScatterPoint::new(0.2, 20.0, 900.0, 0.0),
            ScatterPoint::new(0.3, 30.0, 900.0, 0.0),
        ]);

        assert_eq!(set.top_sales().unwrap().sentiment, 0.3);
        assert!(ScatterSet::default().top_sales().is_none());
    }

    #[test]
    fn test_sales_domain() {
        let set = ScatterSet::new(vec![
            ScatterPoint::new(0.1, 10.0, 500.0, 0.0),
            ScatterPoint::new(0.2, 20.0, 2500.0, 0.0),
        ]);
        assert_eq!(set.sales_domain(), (500.0, 2500.0));
        assert_eq!(ScatterSet::default().sales_domain(), (0.0, 1.0));
    }
}
