// ============================================================================
// Générateur de données simulées (mode démo et mode live)
// ============================================================================
// Produit un jeu de données complet sans backend :
// - 30 jours de ventes / prévisions / sentiment / luminosité
// - 50 points pour le nuage sentiment × luminosité
// - matrice de corrélation sur 5 métriques
//
// CONCEPT RUST : Générique sur le générateur aléatoire
// - `rng: &mut impl Rng` accepte thread_rng() en production et un
//   StdRng::seed_from_u64(..) dans les tests (résultats reproductibles)
// ============================================================================

use chrono::{Duration, Local, NaiveDate};
use rand::Rng;
use tracing::debug;

use crate::models::{
    CorrelationMatrix, DashboardData, RawScatterRecord, ScatterSet, TimeSeries, TimeSeriesPoint,
    DEFAULT_METRICS,
};

pub const MOCK_DAYS: usize = 30;
pub const MOCK_SCATTER_POINTS: usize = 50;

/// Un jour simulé
pub fn mock_point(rng: &mut impl Rng, date: NaiveDate) -> TimeSeriesPoint {
    let actual = rng.gen_range(500.0..1500.0);
    let forecast = rng.gen_range(500.0..1500.0) + (rng.gen::<f64>() - 0.5) * 200.0;
    let sentiment = rng.gen_range(0.3..0.7);
    let brightness = rng.gen_range(30.0..70.0);
    TimeSeriesPoint::new(date, actual, forecast, sentiment, brightness)
}

/// `days` jours consécutifs se terminant à `end` (inclus)
pub fn mock_series(rng: &mut impl Rng, end: NaiveDate, days: usize) -> TimeSeries {
    let points = (0..days)
        .rev()
        .map(|offset| mock_point(rng, end - Duration::days(offset as i64)))
        .collect();
    TimeSeries::from_points(points)
}

/// Mode live : retire le jour le plus ancien, ajoute le lendemain du dernier
pub fn advance_series(rng: &mut impl Rng, series: &mut TimeSeries) {
    let next_date = series
        .last()
        .map(|p| p.date + Duration::days(1))
        .unwrap_or_else(|| Local::now().date_naive());
    series.shift_push(mock_point(rng, next_date));
    debug!(date = %next_date, "Live mode appended a point");
}

/// Enregistrements bruts du nuage, sous la même forme que ceux de l'API
pub fn mock_scatter_records(rng: &mut impl Rng, count: usize) -> Vec<RawScatterRecord> {
    (0..count)
        .map(|_| RawScatterRecord {
            sentiment: Some(rng.gen_range(0.1..0.9)),
            brightness: Some(rng.gen_range(0.0..100.0)),
            sales: Some(rng.gen_range(500.0..2500.0)),
            variance: Some((rng.gen::<f64>() - 0.5) * 0.6),
        })
        .collect()
}

/// Nuage simulé, passé par la même préparation que les données réelles
pub fn mock_scatter(rng: &mut impl Rng, count: usize) -> ScatterSet {
    ScatterSet::prepare(&mock_scatter_records(rng, count))
}

/// Diagonale à 1, chaque cellule hors diagonale tirée indépendamment
/// (la matrice n'est donc pas symétrique)
pub fn mock_correlation(rng: &mut impl Rng) -> CorrelationMatrix {
    let metrics: Vec<String> = DEFAULT_METRICS.iter().map(|m| m.to_string()).collect();
    let n = metrics.len();
    let values = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { 1.0 } else { rng.gen_range(0.1..0.9) })
                .collect::<Vec<f64>>()
        })
        .collect();
    CorrelationMatrix { metrics, values }
}

/// Jeu de données complet se terminant aujourd'hui
pub fn mock_dashboard(rng: &mut impl Rng) -> DashboardData {
    let today = Local::now().date_naive();
    DashboardData {
        series: mock_series(rng, today, MOCK_DAYS),
        scatter: mock_scatter(rng, MOCK_SCATTER_POINTS),
        correlation: mock_correlation(rng),
        ..DashboardData::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_series_is_consecutive_and_in_range() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let series = mock_series(&mut rng(), end, MOCK_DAYS);

        assert_eq!(series.len(), 30);
        assert_eq!(series.last().unwrap().date, end);
        assert_eq!(series.points[0].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());

        for pair in series.points.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        for p in &series.points {
            assert!((500.0..1500.0).contains(&p.actual));
            assert!((400.0..1600.0).contains(&p.forecast));
            assert!((0.3..0.7).contains(&p.sentiment));
            assert!((30.0..70.0).contains(&p.brightness));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let end = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        assert_eq!(mock_series(&mut rng(), end, 5), mock_series(&mut rng(), end, 5));
    }

    #[test]
    fn test_advance_series() {
        let mut rng = rng();
        let end = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let mut series = mock_series(&mut rng, end, 10);

        advance_series(&mut rng, &mut series);

        assert_eq!(series.len(), 10);
        assert_eq!(series.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(series.points[0].date, NaiveDate::from_ymd_opt(2024, 1, 22).unwrap());
    }

    #[test]
    fn test_scatter_ranges() {
        let set = mock_scatter(&mut rng(), MOCK_SCATTER_POINTS);
        assert_eq!(set.len(), 50);
        for p in &set.points {
            assert!((0.1..0.9).contains(&p.sentiment));
            assert!((0.0..100.0).contains(&p.brightness));
            assert!((500.0..2500.0).contains(&p.sales));
            assert!(p.variance.abs() <= 0.3);
        }
    }

    #[test]
    fn test_scatter_goes_through_prepare() {
        let records = mock_scatter_records(&mut rng(), 10);
        assert!(records.iter().all(|r| r.sentiment.is_some() && r.variance.is_some()));
        assert_eq!(mock_scatter(&mut rng(), 10), ScatterSet::prepare(&records));
    }

    #[test]
    fn test_correlation_matrix() {
        let matrix = mock_correlation(&mut rng());
        assert_eq!(matrix.len(), 5);
        assert_eq!(matrix.metrics[0], "Sales");
        for i in 0..5 {
            assert_eq!(matrix.get(i, i), Some(1.0));
            for j in 0..5 {
                if i != j {
                    let r = matrix.get(i, j).unwrap();
                    assert!((0.1..0.9).contains(&r));
                }
            }
        }
    }

    #[test]
    fn test_mock_dashboard() {
        let data = mock_dashboard(&mut rng());
        assert_eq!(data.series.len(), MOCK_DAYS);
        assert_eq!(data.series.last().unwrap().date, Local::now().date_naive());
        assert!(!data.is_empty());
        assert!(data.projection.is_empty());
    }
}
