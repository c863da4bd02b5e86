// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global du tableau de bord
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Données dérivées : annotations, régression et insights sont
//    recalculés à la demande à partir de `data`, jamais stockés
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

use std::collections::VecDeque;

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::analytics::{
    annotate_series, contextual_insight, narrate, Annotation, ChartKind, Narration, RegressionLine,
    HOVER_PROMPT,
};
use crate::api::mock::advance_series;
use crate::api::{ApiError, TokenStatus};
use crate::config::{Config, DataSource};
use crate::models::{AnalysisReport, DashboardData, DataPoint};

/// Taille maximale de l'historique des insights
pub const MAX_INSIGHT_HISTORY: usize = 10;

/// Mode live : un nouveau point toutes les 12 ticks (12 × 250ms ≈ 3s)
pub const LIVE_INTERVAL_TICKS: u32 = 12;

// ============================================================================
// Enum : Tab
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul onglet actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Onglets du tableau de bord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Ventes réelles vs prévues + annotations
    #[default]
    Dashboard,
    /// Historique + projection de l'API
    Forecast,
    /// Sentiment quotidien
    Sentiment,
    /// Nuage sentiment × luminosité
    Visual,
    /// Heatmap des corrélations
    Correlation,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Forecast,
        Tab::Sentiment,
        Tab::Visual,
        Tab::Correlation,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Forecast => "Forecast",
            Tab::Sentiment => "Sentiment",
            Tab::Visual => "Visual",
            Tab::Correlation => "Correlation",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// Onglet à partir de sa position (0-based)
    pub fn from_index(index: usize) -> Option<Tab> {
        Self::ALL.get(index).copied()
    }

    /// Onglet suivant (cycle)
    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Onglet précédent (cycle)
    pub fn previous(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Graphique narré dans cet onglet
    pub fn chart_kind(&self) -> ChartKind {
        match self {
            Tab::Dashboard => ChartKind::Sales,
            Tab::Forecast => ChartKind::Forecast,
            Tab::Sentiment => ChartKind::Sentiment,
            Tab::Visual => ChartKind::Visual,
            Tab::Correlation => ChartKind::Correlation,
        }
    }
}

/// Un insight affiché dans l'historique du panneau
#[derive(Debug, Clone, PartialEq)]
pub struct InsightEntry {
    /// Heure locale ("HH:MM:SS")
    pub time: String,
    pub text: String,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Onglet actuellement affiché
    pub current_tab: Tab,

    /// Données affichées (mock ou API)
    pub data: DashboardData,

    /// Origine des données (affichée dans l'en-tête)
    pub data_source: DataSource,

    /// Seuil de détection des pics et creux
    pub annotation_threshold: f64,

    /// Position du curseur dans la collection de l'onglet courant
    pub cursor: usize,

    /// Snapshot du point sous le curseur
    pub hovered: Option<DataPoint>,

    /// Insights successifs, le plus récent en premier
    /// CONCEPT RUST : VecDeque
    /// - push_front + truncate en O(1) amorti
    pub insight_history: VecDeque<InsightEntry>,

    /// Bulles "Sales Peak" / "Sales Dip" visibles
    pub show_annotations: bool,

    /// Panneau d'insights visible
    pub show_insights: bool,

    /// Mode live : un nouveau point simulé toutes les LIVE_INTERVAL_TICKS
    pub live_mode: bool,
    live_ticks: u32,
    rng: StdRng,

    /// Solde de crédits (None tant que l'API n'a pas répondu)
    pub token_status: Option<TokenStatus>,

    /// Two-step quit
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false (quit réel)
    /// - N'importe quelle autre touche : annulation
    pub confirm_quit: bool,

    /// Indique si des données sont en cours de chargement
    pub is_loading: bool,

    /// Message de chargement optionnel
    pub loading_message: Option<String>,

    /// Dernière erreur de l'API, affichée en bannière dans le footer
    pub last_error: Option<String>,
}

impl App {
    /// Crée une App vide avec la configuration par défaut
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Crée une App vide à partir de la configuration
    pub fn with_config(config: &Config) -> Self {
        Self {
            running: true,
            current_tab: Tab::default(),
            data: DashboardData::default(),
            data_source: config.data_source,
            annotation_threshold: config.annotation_threshold,
            cursor: 0,
            hovered: None,
            insight_history: VecDeque::with_capacity(MAX_INSIGHT_HISTORY),
            show_annotations: true,
            show_insights: true,
            live_mode: false,
            live_ticks: 0,
            rng: StdRng::from_entropy(),
            token_status: None,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            last_error: None,
        }
    }

    /// Crée une App avec des données préchargées
    pub fn with_data(config: &Config, data: DashboardData) -> Self {
        let mut app = Self::with_config(config);
        app.set_data(data);
        app
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Données
    // ========================================================================

    /// Remplace les données affichées
    ///
    /// Le curseur est placé sur le point le plus récent.
    pub fn set_data(&mut self, data: DashboardData) {
        info!(
            points = data.series.len(),
            scatter = data.scatter.len(),
            projection = data.projection.len(),
            "Dashboard data replaced"
        );
        self.data = data;
        self.last_error = None;
        self.cursor = self.cursor_len().saturating_sub(1);
        self.refresh_hover();
    }

    /// Conclusions d'un upload CSV, affichées avant le rechargement complet
    pub fn set_report(&mut self, report: AnalysisReport) {
        info!(
            factors = report.key_factors.len(),
            recommendations = report.recommendations.len(),
            "Analysis report received"
        );
        self.data.report = Some(report);
    }

    /// Annotations de la série (vide si masquées)
    pub fn annotations(&self) -> Vec<Annotation> {
        if self.show_annotations {
            annotate_series(&self.data.series, self.annotation_threshold)
        } else {
            Vec::new()
        }
    }

    /// Droite de régression du nuage sentiment × luminosité
    pub fn regression(&self) -> Option<RegressionLine> {
        RegressionLine::fit(&self.data.scatter.sentiment_brightness_pairs())
    }

    /// Phrase du panneau d'insights pour le point survolé
    pub fn insight_text(&self) -> String {
        match &self.hovered {
            Some(point) => contextual_insight(Some(point)),
            None => HOVER_PROMPT.to_string(),
        }
    }

    /// Narration du graphique de l'onglet courant
    pub fn narration(&self) -> Narration {
        narrate(self.current_tab.chart_kind(), self.hovered.as_ref())
    }

    // ========================================================================
    // Onglets et curseur
    // ========================================================================

    pub fn next_tab(&mut self) {
        self.select_tab(self.current_tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.current_tab.previous());
    }

    /// Change d'onglet et replace le curseur sur le dernier élément
    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.current_tab {
            return;
        }
        debug!(tab = tab.title(), "Tab selected");
        self.current_tab = tab;
        self.cursor = self.cursor_len().saturating_sub(1);
        self.refresh_hover();
    }

    /// Nombre d'éléments parcourus par le curseur dans l'onglet courant
    pub fn cursor_len(&self) -> usize {
        match self.current_tab {
            Tab::Dashboard | Tab::Forecast | Tab::Sentiment => self.data.series.len(),
            Tab::Visual => self.data.scatter.len(),
            Tab::Correlation => self.data.correlation.len(),
        }
    }

    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.refresh_hover();
    }

    pub fn cursor_right(&mut self) {
        let max_index = self.cursor_len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(max_index);
        self.refresh_hover();
    }

    /// Snapshot du point sous le curseur selon l'onglet
    fn hovered_point(&self) -> Option<DataPoint> {
        match self.current_tab {
            Tab::Dashboard | Tab::Forecast => {
                self.data.series.get(self.cursor).map(|p| p.to_data_point())
            }
            // Seul le sentiment est tracé sur cet onglet
            Tab::Sentiment => self
                .data
                .series
                .get(self.cursor)
                .map(|p| DataPoint::new().with_date(p.date).with_sentiment(p.sentiment)),
            Tab::Visual => self.data.scatter.points.get(self.cursor).map(|p| p.to_data_point()),
            Tab::Correlation => self
                .data
                .correlation
                .row_mean_off_diagonal(self.cursor)
                .map(|r| DataPoint::new().with_correlation(r)),
        }
    }

    /// Recalcule le point survolé et alimente l'historique si il change
    pub fn refresh_hover(&mut self) {
        let hovered = self.hovered_point();
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;

        if let Some(point) = &self.hovered {
            let entry = InsightEntry {
                time: Local::now().format("%H:%M:%S").to_string(),
                text: contextual_insight(Some(point)),
            };
            self.insight_history.push_front(entry);
            self.insight_history.truncate(MAX_INSIGHT_HISTORY);
        }
    }

    // ========================================================================
    // Bascules
    // ========================================================================

    pub fn toggle_annotations(&mut self) {
        self.show_annotations = !self.show_annotations;
    }

    pub fn toggle_insights(&mut self) {
        self.show_insights = !self.show_insights;
    }

    pub fn toggle_live_mode(&mut self) {
        self.live_mode = !self.live_mode;
        self.live_ticks = 0;
        info!(live = self.live_mode, "Live mode toggled");
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// CONCEPT : Event Loop Pattern
    /// - En mode live, fait avancer la série d'un jour toutes les
    ///   LIVE_INTERVAL_TICKS itérations
    pub fn tick(&mut self) {
        if !self.live_mode || self.data.series.is_empty() {
            return;
        }

        self.live_ticks += 1;
        if self.live_ticks >= LIVE_INTERVAL_TICKS {
            self.live_ticks = 0;
            advance_series(&mut self.rng, &mut self.data.series);
            self.refresh_hover();
        }
    }

    // ========================================================================
    // Quit, chargement, erreurs
    // ========================================================================

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    /// Démarre le chargement avec un message optionnel
    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    /// Termine le chargement
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    /// Vérifie si des données sont en cours de chargement
    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }

    pub fn set_token_status(&mut self, status: TokenStatus) {
        self.token_status = Some(status);
    }

    /// Affiche une erreur en bannière
    ///
    /// Une erreur typée de l'API ajuste aussi l'état : des crédits épuisés
    /// mettent le badge à zéro.
    pub fn report_error(&mut self, message: String, api_error: Option<&ApiError>) {
        warn!(error = %message, "Error reported to user");
        self.last_error = Some(match api_error {
            Some(ApiError::TokensExhausted) => {
                if let Some(status) = self.token_status.as_mut() {
                    status.used_tokens = status.total_tokens;
                    status.remaining_tokens = 0;
                }
                ApiError::TokensExhausted.banner()
            }
            Some(err) => err.banner(),
            None => message,
        });
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::mock_dashboard;
    use crate::models::{TimeSeries, TimeSeriesPoint};
    use chrono::NaiveDate;

    fn sample_app() -> App {
        let mut rng = StdRng::seed_from_u64(3);
        App::with_data(&Config::default(), mock_dashboard(&mut rng))
    }

    fn series_app(values: &[f64]) -> App {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                TimeSeriesPoint::new(NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap(), v, 100.0, 0.5, 50.0)
            })
            .collect();
        let data = DashboardData {
            series: TimeSeries::from_points(points),
            ..DashboardData::default()
        };
        App::with_data(&Config::default(), data)
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.data.is_empty());
        assert_eq!(app.hovered, None);
        assert_eq!(app.insight_text(), HOVER_PROMPT);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Dashboard.next(), Tab::Forecast);
        assert_eq!(Tab::Correlation.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.previous(), Tab::Correlation);
        assert_eq!(Tab::from_index(3), Some(Tab::Visual));
        assert_eq!(Tab::from_index(5), None);
    }

    #[test]
    fn test_set_data_hovers_latest_point() {
        let app = sample_app();
        assert_eq!(app.cursor, 29);
        let hovered = app.hovered.as_ref().unwrap();
        assert_eq!(hovered.date, Some(app.data.series.last().unwrap().date));
        assert_eq!(app.insight_history.len(), 1);
        assert!(app.insight_text().starts_with("Forecast accuracy"));
    }

    #[test]
    fn test_cursor_navigation() {
        let mut app = series_app(&[100.0, 110.0, 120.0]);
        assert_eq!(app.cursor, 2);

        app.cursor_right();
        assert_eq!(app.cursor, 2);

        app.cursor_left();
        app.cursor_left();
        app.cursor_left();
        assert_eq!(app.cursor, 0);
        assert_eq!(app.hovered.as_ref().unwrap().actual, Some(100.0));
    }

    #[test]
    fn test_insight_history_is_capped_and_newest_first() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let mut app = series_app(&values);

        for _ in 0..15 {
            app.cursor_left();
        }

        assert_eq!(app.insight_history.len(), MAX_INSIGHT_HISTORY);
        // Curseur à l'index 4 : actual = 104 → +4.0%
        assert!(app.insight_history[0].text.contains("+4.0%"));
    }

    #[test]
    fn test_same_hover_is_not_duplicated() {
        let mut app = series_app(&[100.0, 110.0]);
        let before = app.insight_history.len();
        app.cursor_right(); // déjà au bout
        assert_eq!(app.insight_history.len(), before);
    }

    #[test]
    fn test_hover_depends_on_tab() {
        let mut app = sample_app();

        app.select_tab(Tab::Visual);
        assert_eq!(app.cursor, 49);
        assert!(app.insight_text().starts_with("Sales surge"));

        app.select_tab(Tab::Sentiment);
        assert!(app.insight_text().starts_with("Sentiment score"));

        app.select_tab(Tab::Correlation);
        assert!(app.hovered.as_ref().unwrap().correlation.is_some());
        assert_eq!(app.narration().title, "Multi-Modal Correlation");
    }

    #[test]
    fn test_toggle_annotations() {
        let mut app = series_app(&[100.0, 100.0, 150.0, 100.0, 100.0]);
        assert_eq!(app.annotations().len(), 1);

        app.toggle_annotations();
        assert!(app.annotations().is_empty());
    }

    #[test]
    fn test_live_mode_advances_series() {
        let mut app = sample_app();
        let last_date = app.data.series.last().unwrap().date;

        // Sans mode live : rien ne bouge
        for _ in 0..LIVE_INTERVAL_TICKS {
            app.tick();
        }
        assert_eq!(app.data.series.last().unwrap().date, last_date);

        app.toggle_live_mode();
        for _ in 0..LIVE_INTERVAL_TICKS {
            app.tick();
        }
        assert_eq!(app.data.series.len(), 30);
        assert_eq!(app.data.series.last().unwrap().date, last_date.succ_opt().unwrap());
    }

    #[test]
    fn test_report_error() {
        let mut app = App::new();
        app.set_token_status(TokenStatus {
            total_tokens: 1000,
            used_tokens: 900,
            remaining_tokens: 100,
            ..TokenStatus::default()
        });

        app.report_error("402".to_string(), Some(&ApiError::TokensExhausted));
        assert_eq!(app.token_status.as_ref().unwrap().remaining_tokens, 0);
        assert!(app.last_error.as_ref().unwrap().contains("Tokens exhausted"));

        app.report_error("connexion refusée".to_string(), None);
        assert_eq!(app.last_error.as_deref(), Some("connexion refusée"));

        app.clear_error();
        assert_eq!(app.last_error, None);
    }
}
