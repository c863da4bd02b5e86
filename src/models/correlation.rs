// ============================================================================
// Structure : CorrelationMatrix
// ============================================================================
// Matrice de corrélation entre métriques (ventes, sentiment, luminosité...)
// Affichée sous forme de heatmap dans l'onglet Correlation
// ============================================================================

use serde::{Deserialize, Serialize};

/// Métriques par défaut de la heatmap
pub const DEFAULT_METRICS: [&str; 5] = ["Sales", "Sentiment", "Brightness", "Engagement", "Conversion"];

/// Matrice carrée de corrélations, indexée par métrique
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Noms des métriques (lignes et colonnes)
    pub metrics: Vec<String>,

    /// values[i][j] : corrélation entre metrics[i] et metrics[j]
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Valeur de la cellule (i, j), None hors bornes
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied()
    }

    /// Corrélation moyenne hors diagonale
    pub fn mean_off_diagonal(&self) -> Option<f64> {
        let cells: Vec<f64> = self
            .values
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |(j, _)| *j != i)
                    .map(|(_, &v)| v)
            })
            .collect();

        if cells.is_empty() {
            None
        } else {
            Some(cells.iter().sum::<f64>() / cells.len() as f64)
        }
    }

    /// Corrélation moyenne d'une métrique avec toutes les autres
    pub fn row_mean_off_diagonal(&self, row: usize) -> Option<f64> {
        let others: Vec<f64> = self
            .values
            .get(row)?
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != row)
            .map(|(_, &v)| v)
            .collect();

        if others.is_empty() {
            None
        } else {
            Some(others.iter().sum::<f64>() / others.len() as f64)
        }
    }
}
