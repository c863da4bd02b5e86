// ============================================================================
// Annotations : pics et creux significatifs d'une série
// ============================================================================
// Repère les extrema locaux dont la variation relative dépasse un seuil,
// pour afficher des bulles "Sales Peak" / "Sales Dip" sur le graphique.
//
// CONCEPTS RUST :
// 1. slice::windows(3) : fenêtre glissante (précédent, courant, suivant)
// 2. filter_map + take : on s'arrête dès que 3 points sont trouvés
// 3. Fonction pure : pas d'état, pas d'erreur, recalculée à chaque rendu
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::analytics::format::format_thousands;
use crate::models::{TimeSeries, TimeSeriesPoint};

/// Seuil de variation relative par défaut (15%)
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// Nombre maximum d'annotations affichées
pub const MAX_ANNOTATIONS: usize = 3;

/// Type d'extremum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Hausse locale significative
    Peak,
    /// Baisse locale significative
    Valley,
}

/// Un extremum repéré dans la série
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,

    /// Index du point dans la série (jamais une extrémité)
    pub source_index: usize,

    /// Variation relative par rapport au point PRÉCÉDENT (>= 0)
    pub magnitude: f64,
}

/// Contenu affiché dans la bulle d'annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationCallout {
    pub title: &'static str,
    pub value: String,
    pub change: String,
    pub insight: &'static str,
}

/// Repère au plus MAX_ANNOTATIONS extrema dans `values`
///
/// Un point i (1 <= i <= n-2) est :
/// - un pic si v[i] > v[i-1]·(1+t) ET v[i] > v[i+1]·(1+t)
/// - un creux si v[i] < v[i-1]·(1-t) ET v[i] < v[i+1]·(1-t)
///
/// Les 3 PREMIERS points dans l'ordre de la série sont gardés : c'est une
/// limite d'affichage, pas un classement par amplitude.
pub fn find_annotations(values: &[f64], threshold: f64) -> Vec<Annotation> {
    if values.len() < 3 {
        return Vec::new();
    }

    let upper = 1.0 + threshold;
    let lower = 1.0 - threshold;

    values
        .windows(3)
        .enumerate()
        .filter_map(|(offset, window)| {
            let (prev, current, next) = (window[0], window[1], window[2]);
            let source_index = offset + 1;

            if current > prev * upper && current > next * upper {
                Some(Annotation {
                    kind: AnnotationKind::Peak,
                    source_index,
                    magnitude: (current - prev) / prev,
                })
            } else if current < prev * lower && current < next * lower {
                Some(Annotation {
                    kind: AnnotationKind::Valley,
                    source_index,
                    magnitude: (prev - current) / prev,
                })
            } else {
                None
            }
        })
        .take(MAX_ANNOTATIONS)
        .collect()
}

/// Annotations sur les ventes réelles d'une série
pub fn annotate_series(series: &TimeSeries, threshold: f64) -> Vec<Annotation> {
    find_annotations(&series.actual_values(), threshold)
}

impl Annotation {
    pub fn is_peak(&self) -> bool {
        self.kind == AnnotationKind::Peak
    }

    /// Construit la bulle d'annotation pour le point source
    ///
    /// L'explication dépend du sentiment du jour :
    /// - pic : "high sentiment" au-dessus de 0.7, sinon "effective marketing"
    /// - creux : "negative sentiment" sous 0.4, sinon "market challenges"
    pub fn callout(&self, point: &TimeSeriesPoint) -> AnnotationCallout {
        let (title, insight) = match self.kind {
            AnnotationKind::Peak => (
                "Sales Peak",
                if point.sentiment > 0.7 {
                    "Strong performance driven by high sentiment"
                } else {
                    "Strong performance driven by effective marketing"
                },
            ),
            AnnotationKind::Valley => (
                "Sales Dip",
                if point.sentiment < 0.4 {
                    "Performance dip may indicate negative sentiment"
                } else {
                    "Performance dip may indicate market challenges"
                },
            ),
        };

        AnnotationCallout {
            title,
            value: format!("${}", format_thousands(point.actual)),
            change: format!("{:.1}%", self.magnitude * 100.0),
            insight,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_short_series_has_no_annotation() {
        assert!(find_annotations(&[], DEFAULT_THRESHOLD).is_empty());
        assert!(find_annotations(&[100.0], DEFAULT_THRESHOLD).is_empty());
        assert!(find_annotations(&[100.0, 500.0], DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_single_peak() {
        let annotations = find_annotations(&[100.0, 100.0, 150.0, 100.0, 100.0], DEFAULT_THRESHOLD);

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].kind, AnnotationKind::Peak);
        assert_eq!(annotations[0].source_index, 2);
        assert!((annotations[0].magnitude - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_valley() {
        let annotations = find_annotations(&[100.0, 50.0, 100.0], DEFAULT_THRESHOLD);

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].kind, AnnotationKind::Valley);
        assert!((annotations[0].magnitude - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_below_threshold_is_ignored() {
        // +10% seulement : sous le seuil de 15%
        assert!(find_annotations(&[100.0, 110.0, 100.0], DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_first_three_by_position() {
        // Quatre pics, le dernier est le plus fort mais il est coupé
        let values = [100.0, 200.0, 100.0, 200.0, 100.0, 200.0, 100.0, 900.0, 100.0];
        let annotations = find_annotations(&values, DEFAULT_THRESHOLD);

        // Les creux intermédiaires (index 2, 4, 6) comptent aussi
        let indices: Vec<usize> = annotations.iter().map(|a| a.source_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(annotations.iter().all(|a| a.magnitude < 8.0));
    }

    #[test]
    fn test_random_series_invariants() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let len = rng.gen_range(0..20);
            let values: Vec<f64> = (0..len).map(|_| rng.gen_range(1.0..1000.0)).collect();
            let threshold = rng.gen_range(0.01..0.5);
            let annotations = find_annotations(&values, threshold);

            assert!(annotations.len() <= MAX_ANNOTATIONS);
            for annotation in &annotations {
                assert!(annotation.source_index > 0);
                assert!(annotation.source_index < values.len() - 1);
                assert!(annotation.magnitude >= 0.0);
            }

            // Un même index n'apparaît jamais deux fois (pic ET creux)
            let mut indices: Vec<usize> = annotations.iter().map(|a| a.source_index).collect();
            indices.dedup();
            assert_eq!(indices.len(), annotations.len());
        }
    }

    #[test]
    fn test_callout_content() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let point = TimeSeriesPoint::new(date, 1500.0, 1200.0, 0.8, 60.0);
        let peak = Annotation {
            kind: AnnotationKind::Peak,
            source_index: 4,
            magnitude: 0.5,
        };

        let callout = peak.callout(&point);
        assert_eq!(callout.title, "Sales Peak");
        assert_eq!(callout.value, "$1,500");
        assert_eq!(callout.change, "50.0%");
        assert_eq!(callout.insight, "Strong performance driven by high sentiment");

        let valley = Annotation {
            kind: AnnotationKind::Valley,
            ..peak
        };
        let callout = valley.callout(&point);
        assert_eq!(callout.title, "Sales Dip");
        assert_eq!(callout.insight, "Performance dip may indicate market challenges");
    }
}
