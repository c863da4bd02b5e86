// ============================================================================
// Module : analytics
// ============================================================================
// Fonctions pures consommées par les widgets : aucune E/S, aucun état global.
// Elles sont recalculées à chaque rendu.
// ============================================================================

pub mod annotations; // Pics et creux d'une série
pub mod color;       // Dégradé de variance
pub mod format;      // Séparateurs de milliers, pourcentages
pub mod insight;     // Phrase contextuelle du point survolé
pub mod narration;   // Titre + paragraphe par graphique
pub mod regression;  // Droite des moindres carrés
pub mod summary;     // Résumé du nuage, intensité de corrélation

pub use annotations::{annotate_series, find_annotations, Annotation, AnnotationCallout, AnnotationKind};
pub use color::{variance_color, Rgb};
pub use format::format_thousands;
pub use insight::{contextual_insight, SentimentBand, FALLBACK_INSIGHT, HOVER_PROMPT};
pub use narration::{narrate, ChartKind, Narration};
pub use regression::RegressionLine;
pub use summary::{scatter_summary, tooltip_descriptor, CorrelationStrength};
