// ============================================================================
// Structure : TimeSeriesPoint (ventes réelles, prévision, sentiment, luminosité)
// ============================================================================
// Représente une journée du tableau de bord multimodal
//
// CONCEPTS RUST :
// 1. NaiveDate : date calendaire sans fuseau horaire (chrono)
// 2. f64 : floating point 64 bits pour toutes les mesures
// 3. Vec<T> : la série est ordonnée chronologiquement
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::DataPoint;

/// Format des dates dans l'API et dans les textes générés
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Une journée de la série temporelle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Date de la mesure ("YYYY-MM-DD" en JSON)
    pub date: NaiveDate,

    /// Ventes réelles (toujours >= 0)
    pub actual: f64,

    /// Ventes prévues par le modèle
    pub forecast: f64,

    /// Score de sentiment normalisé [0, 1]
    pub sentiment: f64,

    /// Luminosité des visuels de campagne [0, 100]
    pub brightness: f64,
}

impl TimeSeriesPoint {
    /// Constructeur
    pub fn new(date: NaiveDate, actual: f64, forecast: f64, sentiment: f64, brightness: f64) -> Self {
        Self {
            date,
            actual,
            forecast,
            sentiment,
            brightness,
        }
    }

    /// Snapshot "survolé" de ce point, consommé par le générateur d'insights
    ///
    /// Tous les champs de la série sont présents, la corrélation reste absente
    pub fn to_data_point(&self) -> DataPoint {
        DataPoint::new()
            .with_date(self.date)
            .with_actual(self.actual)
            .with_forecast(self.forecast)
            .with_sentiment(self.sentiment)
            .with_brightness(self.brightness)
    }
}

/// Série temporelle complète, triée par date croissante
///
/// CONCEPT RUST : Ownership
/// - TimeSeries possède le Vec, le Vec possède les points
/// - Les annotations sont recalculées à partir d'un emprunt (&TimeSeries)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Crée une série vide
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Crée une série à partir de points déjà ordonnés
    pub fn from_points(points: Vec<TimeSeriesPoint>) -> Self {
        Self { points }
    }

    /// Ajoute un point en fin de série
    pub fn push(&mut self, point: TimeSeriesPoint) {
        self.points.push(point);
    }

    /// Mode live : retire le plus ancien point et ajoute le nouveau
    ///
    /// La fenêtre garde donc toujours la même taille
    pub fn shift_push(&mut self, point: TimeSeriesPoint) {
        if !self.points.is_empty() {
            self.points.remove(0);
        }
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimeSeriesPoint> {
        self.points.get(index)
    }

    /// Point le plus récent
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// Valeurs primaires (ventes réelles) dans l'ordre chronologique
    pub fn actual_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.actual).collect()
    }

    /// Bornes (min, max) des ventes réelles ET prévues, pour l'axe Y
    ///
    /// CONCEPT RUST : fold pour calculer min/max en un seul passage
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }

        Some(self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), p| {
                (
                    min.min(p.actual).min(p.forecast),
                    max.max(p.actual).max(p.forecast),
                )
            },
        ))
    }

    /// Sentiment moyen sur la période
    pub fn mean_sentiment(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.sentiment).sum();
        Some(sum / self.points.len() as f64)
    }

    /// Variation totale des ventes réelles entre le premier et le dernier jour (%)
    pub fn total_change_percent(&self) -> Option<f64> {
        let (first, last) = (self.points.first()?, self.points.last()?);
        if first.actual == 0.0 {
            return None;
        }
        Some((last.actual - first.actual) / first.actual * 100.0)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| TimeSeriesPoint::new(day(i as u32 + 1), v, v, 0.5, 50.0))
                .collect(),
        )
    }

    #[test]
    fn test_to_data_point() {
        let point = TimeSeriesPoint::new(day(1), 110.0, 100.0, 0.5, 50.0).to_data_point();
        assert_eq!(point.date, Some(day(1)));
        assert_eq!(point.actual, Some(110.0));
        assert_eq!(point.forecast, Some(100.0));
        assert_eq!(point.brightness, Some(50.0));
        assert_eq!(point.sales, None);
        assert_eq!(point.correlation, None);
    }

    #[test]
    fn test_shift_push_keeps_window() {
        let mut data = series(&[1.0, 2.0, 3.0]);
        data.shift_push(TimeSeriesPoint::new(day(4), 4.0, 4.0, 0.5, 50.0));

        assert_eq!(data.len(), 3);
        assert_eq!(data.actual_values(), vec![2.0, 3.0, 4.0]);
        assert_eq!(data.last().unwrap().date, day(4));
    }

    #[test]
    fn test_value_bounds_include_forecast() {
        let data = TimeSeries::from_points(vec![
            TimeSeriesPoint::new(day(1), 100.0, 80.0, 0.5, 50.0),
            TimeSeriesPoint::new(day(2), 120.0, 140.0, 0.5, 50.0),
        ]);

        assert_eq!(data.value_bounds(), Some((80.0, 140.0)));
        assert_eq!(TimeSeries::new().value_bounds(), None);
    }

    #[test]
    fn test_total_change_percent() {
        let data = series(&[100.0, 90.0, 150.0]);
        assert!((data.total_change_percent().unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_data_point_snapshot() {
        let point = TimeSeriesPoint::new(day(2), 110.0, 100.0, 0.6, 40.0);
        let snapshot = point.to_data_point();

        assert_eq!(snapshot.date, Some(day(2)));
        assert_eq!(snapshot.actual, Some(110.0));
        assert_eq!(snapshot.sales, None);
    }

    #[test]
    fn test_serde_date_format() {
        let point = TimeSeriesPoint::new(day(1), 1.0, 2.0, 0.5, 50.0);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"2024-01-01\""));
    }
}
