// ============================================================================
// Régression linéaire (moindres carrés) pour le nuage de points
// ============================================================================
// Droite y = a·x + b superposée au nuage sentiment (x) × luminosité (y)
//
//   a = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
//   b = (Σy − a·Σx) / n
//
// CONCEPT RUST : Option comme résultat "rien à dessiner"
// - Moins de 2 points : None
// - Tous les x identiques (droite verticale) : None
// - Jamais de panic ni d'erreur : l'appelant n'a simplement rien à tracer
// ============================================================================

use serde::{Deserialize, Serialize};

/// Droite de régression y = slope·x + intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionLine {
    /// Ajuste la droite des moindres carrés sur des paires (x, y)
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        // Cas dégénéré détecté par égalité stricte, avant tout calcul
        let first_x = points[0].0;
        if points.iter().all(|&(x, _)| x == first_x) {
            return None;
        }

        let n = points.len() as f64;
        let (sum_x, sum_y, sum_xy, sum_xx) = points.iter().fold(
            (0.0, 0.0, 0.0, 0.0),
            |(sx, sy, sxy, sxx), &(x, y)| (sx + x, sy + y, sxy + x * y, sxx + x * x),
        );

        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator == 0.0 {
            return None;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        Some(Self { slope, intercept })
    }

    /// Valeur prédite en x
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Segment à tracer entre les bornes de l'axe X
    ///
    /// Étape de présentation séparée : les y prédits aux extrémités sont
    /// ramenés dans la plage affichable, la droite elle-même reste intacte.
    pub fn display_segment(&self, x_bounds: (f64, f64), y_bounds: (f64, f64)) -> [(f64, f64); 2] {
        let clamp = |y: f64| y.max(y_bounds.0).min(y_bounds.1);
        [
            (x_bounds.0, clamp(self.predict(x_bounds.0))),
            (x_bounds.1, clamp(self.predict(x_bounds.1))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_not_enough_points() {
        assert_eq!(RegressionLine::fit(&[]), None);
        assert_eq!(RegressionLine::fit(&[(0.5, 50.0)]), None);
    }

    #[test]
    fn test_identical_x_is_degenerate() {
        assert_eq!(RegressionLine::fit(&[(0.1, 10.0), (0.1, 20.0), (0.1, 90.0)]), None);
        assert_eq!(RegressionLine::fit(&[(0.3, 10.0), (0.3, 10.0)]), None);
    }

    #[test]
    fn test_two_points_exact_line() {
        let a = (0.2, 30.0);
        let b = (0.8, 75.0);
        let line = RegressionLine::fit(&[a, b]).unwrap();

        assert!((line.predict(a.0) - a.1).abs() < EPSILON);
        assert!((line.predict(b.0) - b.1).abs() < EPSILON);
        assert!((line.slope - 75.0).abs() < EPSILON);
    }

    #[test]
    fn test_collinear_points_have_zero_residuals() {
        let points: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let x = i as f64 / 10.0;
                (x, 20.0 + 60.0 * x)
            })
            .collect();
        let line = RegressionLine::fit(&points).unwrap();

        for &(x, y) in &points {
            assert!((line.predict(x) - y).abs() < 1e-6);
        }
        assert!((line.slope - 60.0).abs() < 1e-6);
        assert!((line.intercept - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_noisy_points() {
        // y = 2x + 1 avec un bruit symétrique : la pente reste 2
        let points = [(0.0, 1.5), (0.0, 0.5), (1.0, 3.5), (1.0, 2.5)];
        let line = RegressionLine::fit(&points).unwrap();
        assert!((line.slope - 2.0).abs() < EPSILON);
        assert!((line.intercept - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_display_segment_is_clamped() {
        let line = RegressionLine {
            slope: 150.0,
            intercept: -20.0,
        };
        let segment = line.display_segment((0.0, 1.0), (0.0, 100.0));

        assert_eq!(segment, [(0.0, 0.0), (1.0, 100.0)]);
        // La droite elle-même n'est pas modifiée
        assert_eq!(line.predict(1.0), 130.0);
    }
}
