// ============================================================================
// Erreurs HTTP de l'API d'analyse
// ============================================================================
// Certains statuts ont un sens métier et changent l'état de l'interface :
// - 401 : session expirée (jeton d'accès à renouveler)
// - 402 : crédits épuisés (passage à une offre supérieure)
// - 429 : trop de requêtes, réessayer après `retry_after` secondes
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère impl std::error::Error + Display
// - L'erreur voyage ensuite dans un anyhow::Error, et le worker la
//   récupère avec downcast_ref::<ApiError>()
// ============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Délai par défaut quand le serveur n'indique pas retry_after (secondes)
pub const DEFAULT_RETRY_AFTER: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Session expirée : jeton d'accès invalide")]
    Unauthorized,

    #[error("Crédits épuisés : mise à niveau requise")]
    TokensExhausted,

    #[error("Trop de requêtes : réessayer dans {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("L'API d'analyse a retourné une erreur : HTTP {status} ({body})")]
    Status { status: u16, body: String },
}

impl ApiError {
    /// Construit l'erreur à partir du statut et du corps de la réponse
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            402 => ApiError::TokensExhausted,
            429 => ApiError::RateLimited {
                retry_after: parse_retry_after(body).unwrap_or(DEFAULT_RETRY_AFTER),
            },
            code => ApiError::Status {
                status: code,
                body: body.trim().to_string(),
            },
        }
    }

    /// Message court pour la bannière d'erreur
    pub fn banner(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired, set LUMENBOARD_ACCESS_TOKEN".to_string(),
            ApiError::TokensExhausted => "Tokens exhausted, upgrade your plan".to_string(),
            ApiError::RateLimited { retry_after } => format!("Rate limited, retry in {}s", retry_after),
            ApiError::Status { status, .. } => format!("Analysis API error (HTTP {})", status),
        }
    }
}

/// Lit `retry_after` dans un corps JSON ({"retry_after": 30})
fn parse_retry_after(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("retry_after")?.as_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized);
        assert_eq!(
            ApiError::from_status(StatusCode::PAYMENT_REQUIRED, "{}"),
            ApiError::TokensExhausted
        );
        assert_eq!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, " boom \n"),
            ApiError::Status {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_rate_limit_retry_after() {
        assert_eq!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, r#"{"retry_after": 12}"#),
            ApiError::RateLimited { retry_after: 12 }
        );
        assert_eq!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "not json"),
            ApiError::RateLimited {
                retry_after: DEFAULT_RETRY_AFTER
            }
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = ApiError::TokensExhausted.into();
        let err = err.context("Échec de la prévision");
        assert_eq!(err.downcast_ref::<ApiError>(), Some(&ApiError::TokensExhausted));
    }
}
