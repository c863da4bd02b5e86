// ============================================================================
// Structure : DataPoint
// ============================================================================
// Snapshot du point survolé dans un graphique
//
// CONCEPT RUST : Option<T> pour chaque champ
// - Selon le graphique, seule une partie des champs est connue
//   (série temporelle : actual/forecast, nuage de points : sales/variance)
// - Le générateur d'insights choisit sa phrase selon les champs présents
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point de données "survolé", tous les champs sont optionnels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: Option<NaiveDate>,
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
    pub sentiment: Option<f64>,
    pub brightness: Option<f64>,
    pub sales: Option<f64>,
    pub variance: Option<f64>,

    /// Corrélation moyenne (heatmap uniquement)
    pub correlation: Option<f64>,
}

impl DataPoint {
    /// Snapshot vide (aucun champ présent)
    pub fn new() -> Self {
        Self::default()
    }

    // CONCEPT RUST : Builder pattern par valeur
    // - Chaque méthode consomme self et le retourne modifié
    // - Permet DataPoint::new().with_sales(1000.0).with_sentiment(0.8)

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_actual(mut self, actual: f64) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_forecast(mut self, forecast: f64) -> Self {
        self.forecast = Some(forecast);
        self
    }

    pub fn with_sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn with_sales(mut self, sales: f64) -> Self {
        self.sales = Some(sales);
        self
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = Some(variance);
        self
    }

    pub fn with_correlation(mut self, correlation: f64) -> Self {
        self.correlation = Some(correlation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let point = DataPoint::new().with_sales(1000.0).with_sentiment(0.8);

        assert_eq!(point.sales, Some(1000.0));
        assert_eq!(point.sentiment, Some(0.8));
        assert_eq!(point.brightness, None);
        assert_eq!(DataPoint::new(), DataPoint::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let point: DataPoint = serde_json::from_str(r#"{"actual": 110, "forecast": 100}"#).unwrap();
        assert_eq!(point.actual, Some(110.0));
        assert_eq!(point.forecast, Some(100.0));
        assert_eq!(point.date, None);
    }
}
