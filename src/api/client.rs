// ============================================================================
// Client de l'API d'analyse (analyse, prévision, explications, crédits)
// ============================================================================
// Le backend expose :
// - POST /analyze/          upload multipart du CSV de ventes
// - POST /forecast/         prévision à N jours pour une analyse
// - POST /explain/          importance des variables (SHAP)
// - GET  /analyze/history/  analyses récentes de l'utilisateur
// - GET  /tokens/status     solde de crédits
//
// Authentification : en-tête "Authorization: Bearer <token>"
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : les appels tournent dans le runtime tokio du worker
// 2. Génériques + DeserializeOwned : une seule fonction d'envoi pour toutes
//    les réponses JSON
// 3. thiserror + anyhow : statuts métier typés, le reste avec contexte
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::api::ApiError;
use crate::config::Config;
use crate::models::{AnalysisReport, FeatureImportance, TimeSeries, TimeSeriesPoint, DATE_FORMAT};

/// Contexte de campagne par défaut pour les points issus de l'API
/// (la prévision ne renvoie ni sentiment ni luminosité)
const DEFAULT_SENTIMENT: f64 = 0.5;
const DEFAULT_BRIGHTNESS: f64 = 50.0;

// ============================================================================
// Structures pour parser les réponses JSON
// ============================================================================
// CONCEPT RUST : #[serde(default)]
// - Un champ absent du JSON prend la valeur Default::default()
// - Le backend omet souvent des blocs entiers en mode dégradé
// ============================================================================

/// Réponse de POST /analyze/
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, deserialize_with = "id_as_string")]
    pub analysis_id: Option<String>,

    #[serde(default)]
    pub insights: Option<AnalysisInsights>,

    #[serde(default)]
    pub data_summary: Option<DataSummary>,
}

/// Insights générés par le modèle de langage
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisInsights {
    #[serde(default)]
    pub summary: Option<String>,

    // Le format exact varie (texte ou objet), on garde le JSON brut
    #[serde(default)]
    pub key_factors: Vec<serde_json::Value>,

    #[serde(default)]
    pub recommendations: Vec<serde_json::Value>,
}

impl AnalysisInsights {
    /// Version affichable : chaque entrée est ramenée à une ligne de texte
    pub fn to_report(&self) -> AnalysisReport {
        AnalysisReport {
            summary: self.summary.clone().filter(|s| !s.trim().is_empty()),
            key_factors: self.key_factors.iter().filter_map(insight_text).collect(),
            recommendations: self.recommendations.iter().filter_map(insight_text).collect(),
        }
    }
}

/// Texte d'une entrée d'insight : une chaîne telle quelle, un objet par son
/// champ le plus parlant ("name", "factor", "feature", "title"), sinon le JSON
fn insight_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()).filter(|t| !t.trim().is_empty()),
        serde_json::Value::Object(fields) => ["name", "factor", "feature", "title"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or_else(|| Some(value.to_string())),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSummary {
    pub rows: usize,

    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Réponse de POST /forecast/
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, deserialize_with = "id_as_string")]
    pub forecast_id: Option<String>,

    pub forecast: ForecastData,

    #[serde(default)]
    pub period: Option<String>,
}

/// Historique + prévision, colonnes parallèles (dates[i] ↔ values[i])
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastData {
    #[serde(default)]
    pub historical: HistoricalValues,

    #[serde(default)]
    pub forecast: ForecastValues,

    #[serde(default)]
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalValues {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastValues {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub lower_bound: Vec<f64>,
    #[serde(default)]
    pub upper_bound: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trend {
    pub direction: String,
    pub confidence: f64,
}

/// Réponse de POST /explain/
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, deserialize_with = "id_as_string")]
    pub explanation_id: Option<String>,

    pub explanations: Explanations,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Explanations {
    #[serde(default)]
    pub feature_importance: Vec<FeatureImportance>,

    #[serde(default)]
    pub insights: serde_json::Value,
}

/// Réponse de GET /analyze/history/
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    results: Vec<AnalysisRecord>,
}

/// Une analyse passée (les plus récentes en premier)
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// Solde de crédits (GET /tokens/status)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenStatus {
    #[serde(default)]
    pub plan: String,
    pub total_tokens: u64,
    pub used_tokens: u64,
    pub remaining_tokens: u64,
    #[serde(default)]
    pub last_used: Option<String>,
}

impl TokenStatus {
    /// Part restante dans [0, 1] (0 si aucun crédit alloué)
    pub fn ratio(&self) -> f64 {
        if self.total_tokens == 0 {
            0.0
        } else {
            (self.remaining_tokens as f64 / self.total_tokens as f64).min(1.0)
        }
    }

    /// Texte du badge d'en-tête ("750 / 1000")
    pub fn badge(&self) -> String {
        format!("{} / {}", self.remaining_tokens, self.total_tokens)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_tokens == 0
    }
}

/// Corps JSON de /forecast/ et /explain/
#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    analysis_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
}

/// Les identifiants Supabase sont soit des entiers, soit des UUID texte
///
/// CONCEPT RUST : deserialize_with
/// - Fonction appelée par serde à la place du Deserialize par défaut
fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ============================================================================
// Conversion vers les modèles du tableau de bord
// ============================================================================

fn parse_date(raw: &str) -> Result<NaiveDate> {
    // Prophet peut renvoyer "YYYY-MM-DD HH:MM:SS" : on ne garde que la date
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT).with_context(|| format!("Date invalide : {}", raw))
}

impl ForecastData {
    /// Historique sous forme de série (réel = prévision = valeur observée)
    pub fn to_time_series(&self) -> Result<TimeSeries> {
        let historical = &self.historical;
        if historical.dates.len() != historical.values.len() {
            warn!(
                dates = historical.dates.len(),
                values = historical.values.len(),
                "Historical columns have different lengths, truncating"
            );
        }

        let mut series = TimeSeries::new();
        for (date, &value) in historical.dates.iter().zip(&historical.values) {
            series.push(TimeSeriesPoint::new(
                parse_date(date)?,
                value,
                value,
                DEFAULT_SENTIMENT,
                DEFAULT_BRIGHTNESS,
            ));
        }
        Ok(series)
    }

    /// Valeurs futures prévues (date, valeur)
    pub fn projection(&self) -> Result<Vec<(NaiveDate, f64)>> {
        self.forecast
            .dates
            .iter()
            .zip(&self.forecast.values)
            .map(|(date, &value)| Ok((parse_date(date)?, value)))
            .collect()
    }
}

// ============================================================================
// Client HTTP
// ============================================================================

/// Client de l'API d'analyse
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client contient un Arc interne, le cloner partage le pool
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl AnalysisClient {
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self> {
        debug!(base_url = %base_url, "Creating analysis API client");
        let http = reqwest::Client::builder()
            .user_agent(concat!("lumenboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.access_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Envoie la requête, vérifie le statut et désérialise la réponse
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, endpoint: &str) -> Result<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .with_context(|| format!("Échec de la requête HTTP vers {}", endpoint))?;

        let status = response.status();
        debug!(status = %status, endpoint = %endpoint, "Received HTTP response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let api_error = ApiError::from_status(status, &body);
            error!(status = %status, endpoint = %endpoint, error = %api_error, "Analysis API returned error status");
            return Err(api_error.into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Échec du parsing JSON de la réponse {}", endpoint))
    }

    /// Envoie un CSV de ventes pour analyse
    #[instrument(skip(self), fields(path = %csv_path.display()))]
    pub async fn analyze(&self, csv_path: &Path) -> Result<AnalyzeResponse> {
        let bytes = tokio::fs::read(csv_path)
            .await
            .with_context(|| format!("Impossible de lire {}", csv_path.display()))?;

        let file_name = csv_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sales.csv".to_string());

        debug!(bytes = bytes.len(), file_name = %file_name, "Uploading sales data");
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")
            .context("Type MIME invalide")?;
        let form = Form::new().part("file", part);

        let request = self.http.post(self.url("/analyze/")).multipart(form);
        let response: AnalyzeResponse = self.send(request, "/analyze/").await?;

        info!(analysis_id = ?response.analysis_id, "Analysis completed");
        Ok(response)
    }

    /// Demande une prévision à `days` jours
    ///
    /// L'identifiant est envoyé en query ET dans le corps JSON : le backend
    /// lit la query, les anciens clients envoyaient le corps.
    #[instrument(skip(self))]
    pub async fn forecast(&self, analysis_id: &str, days: u32) -> Result<ForecastResponse> {
        let request = self
            .http
            .post(self.url("/forecast/"))
            .query(&[("analysis_id", analysis_id.to_string()), ("days", days.to_string())])
            .json(&AnalysisRequest {
                analysis_id,
                days: Some(days),
            });

        let response: ForecastResponse = self.send(request, "/forecast/").await?;
        info!(
            historical = response.forecast.historical.values.len(),
            projected = response.forecast.forecast.values.len(),
            "Forecast received"
        );
        Ok(response)
    }

    /// Demande les explications (importance des variables)
    #[instrument(skip(self))]
    pub async fn explain(&self, analysis_id: &str) -> Result<ExplainResponse> {
        let request = self
            .http
            .post(self.url("/explain/"))
            .query(&[("analysis_id", analysis_id)])
            .json(&AnalysisRequest {
                analysis_id,
                days: None,
            });

        let response: ExplainResponse = self.send(request, "/explain/").await?;
        info!(
            features = response.explanations.feature_importance.len(),
            "Explanations received"
        );
        Ok(response)
    }

    /// Analyses récentes, la plus récente en premier
    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<AnalysisRecord>> {
        let request = self.http.get(self.url("/analyze/history/"));
        let response: HistoryResponse = self.send(request, "/analyze/history/").await?;
        debug!(count = response.results.len(), "Analysis history received");
        Ok(response.results)
    }

    /// Solde de crédits
    #[instrument(skip(self))]
    pub async fn token_status(&self) -> Result<TokenStatus> {
        let request = self.http.get(self.url("/tokens/status"));
        let status: TokenStatus = self.send(request, "/tokens/status").await?;
        debug!(remaining = status.remaining_tokens, total = status.total_tokens, "Token status received");
        Ok(status)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = AnalysisClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.url("/forecast/"), "http://localhost:8000/forecast/");
    }

    #[test]
    fn test_parse_forecast_response() {
        let json = r#"{
            "success": true,
            "forecast_id": 42,
            "forecast": {
                "historical": {"dates": ["2024-01-01", "2024-01-02"], "values": [100.0, 120.0]},
                "forecast": {
                    "dates": ["2024-01-03 00:00:00"],
                    "values": [130.0],
                    "lower_bound": [104.0],
                    "upper_bound": [156.0]
                },
                "trend": {"direction": "increasing", "confidence": 0.85},
                "seasonality": {"weekly_pattern": [0.1]}
            },
            "period": "30 days"
        }"#;

        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.forecast_id.as_deref(), Some("42"));

        let series = response.forecast.to_time_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[1].actual, 120.0);
        assert_eq!(series.points[1].forecast, 120.0);
        assert_eq!(series.points[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let projection = response.forecast.projection().unwrap();
        assert_eq!(projection, vec![(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 130.0)]);
    }

    #[test]
    fn test_invalid_forecast_date() {
        let data = ForecastData {
            historical: HistoricalValues {
                dates: vec!["01/02/2024".to_string()],
                values: vec![1.0],
            },
            ..ForecastData::default()
        };
        assert!(data.to_time_series().is_err());
    }

    #[test]
    fn test_parse_analyze_response() {
        let json = r#"{
            "success": true,
            "analysis_id": "7f1c-uuid",
            "insights": {"summary": "Sales are up", "key_factors": ["sentiment"]},
            "data_summary": {"rows": 30, "columns": ["date", "sales"], "date_range": null}
        }"#;

        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.analysis_id.as_deref(), Some("7f1c-uuid"));
        let insights = response.insights.unwrap();
        assert_eq!(insights.summary.as_deref(), Some("Sales are up"));
        assert!(insights.recommendations.is_empty());
        assert_eq!(response.data_summary.unwrap().rows, 30);
    }

    #[test]
    fn test_insights_to_report() {
        let json = r#"{
            "summary": "Strong growth with seasonal patterns",
            "key_factors": [
                {"name": "Marketing Spend", "impact": 0.35},
                "Customer Satisfaction",
                {"impact": 0.1},
                null
            ],
            "recommendations": ["Increase marketing budget by 20% for Q2", ""]
        }"#;

        let insights: AnalysisInsights = serde_json::from_str(json).unwrap();
        let report = insights.to_report();

        assert_eq!(report.summary.as_deref(), Some("Strong growth with seasonal patterns"));
        assert_eq!(
            report.key_factors,
            vec!["Marketing Spend", "Customer Satisfaction", r#"{"impact":0.1}"#]
        );
        assert_eq!(report.recommendations, vec!["Increase marketing budget by 20% for Q2"]);
        assert!(AnalysisInsights::default().to_report().is_empty());
    }

    #[test]
    fn test_parse_explain_and_history() {
        let json = r#"{
            "success": true,
            "explanation_id": null,
            "explanations": {
                "feature_importance": [
                    {"feature": "sentiment", "importance": 0.4, "impact": "positive", "description": "Tone"}
                ],
                "insights": ["Sentiment drives sales"]
            }
        }"#;
        let response: ExplainResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.explanation_id, None);
        assert!(response.explanations.feature_importance[0].is_positive());

        let history: HistoryResponse =
            serde_json::from_str(r#"{"results": [{"id": 3, "created_at": "2024-05-01"}, {"id": "abc"}]}"#).unwrap();
        assert_eq!(history.results[0].id.as_deref(), Some("3"));
        assert_eq!(history.results[1].created_at, None);
    }

    #[test]
    fn test_token_status() {
        let status: TokenStatus = serde_json::from_str(
            r#"{"plan": "free", "total_tokens": 1000, "used_tokens": 250, "remaining_tokens": 750}"#,
        )
        .unwrap();

        assert!((status.ratio() - 0.75).abs() < 1e-12);
        assert_eq!(status.badge(), "750 / 1000");
        assert!(!status.is_exhausted());
        assert_eq!(TokenStatus::default().ratio(), 0.0);
    }

    // CONCEPT RUST : #[tokio::test]
    // - Setup un runtime tokio pour le test
    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        // Port 9 (discard) : connexion refusée en local
        let client = AnalysisClient::new("http://127.0.0.1:9", Some("token".to_string())).unwrap();
        let result = client.token_status().await;

        let err = result.unwrap_err();
        assert!(err.downcast_ref::<ApiError>().is_none());
        assert!(format!("{:#}", err).contains("/tokens/status"));
    }

    #[tokio::test]
    async fn test_analyze_missing_file() {
        let client = AnalysisClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client
            .analyze(Path::new("/nonexistent/lumenboard-sales.csv"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Impossible de lire"));
    }
}
