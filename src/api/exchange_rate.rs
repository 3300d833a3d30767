// ============================================================================
// API Client : ExchangeRate-API
// ============================================================================
// Récupère la table des taux d'une devise de base depuis l'API publique
// GET {base_url}/v4/latest/{base}
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : requête HTTP non-bloquante
// 2. Serde : désérialisation structurée du JSON (pas de recherche de texte)
// 3. #[serde(untagged)] : accepter plusieurs formes de document
// 4. Conversion d'erreurs : reqwest/serde -> RateError via From
// ============================================================================

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::api::{lookup_rate, ProviderConfig, RateError, RateProvider};
use crate::models::{CurrencyCode, RateTable};

// ============================================================================
// Structures pour parser la réponse JSON
// ============================================================================
// Réponse typique :
// {
//   "provider": "https://www.exchangerate-api.com",
//   "base": "USD",
//   "date": "2024-05-02",
//   "time_last_updated": 1714608001,
//   "rates": { "USD": 1, "EUR": 0.9231, "GBP": 0.8054, ... }
// }
//
// Les champs inconnus (provider, terms, ...) sont ignorés par serde.
// Les taux sont lus comme des `Value` : une entrée non numérique (ex:
// "XDR": null) ne rend invalide que sa propre devise, pas le document.
// ============================================================================

/// Réponse complète de l'endpoint /v4/latest
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    date: Option<String>,
    rates: Map<String, Value>,
}

/// Formes de document acceptées
///
/// CONCEPT RUST : #[serde(untagged)]
/// - Serde essaie chaque variant dans l'ordre
/// - Full : document complet avec un objet "rates"
/// - Bare : objet plat {"EUR": 0.92, "GBP": 0.80}
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RatesDocument {
    Full(LatestRatesResponse),
    Bare(Map<String, Value>),
}

/// Document normalisé, quelle que soit sa forme d'origine
#[derive(Debug)]
struct ParsedRates {
    base: Option<String>,
    date: Option<NaiveDate>,
    rates: HashMap<String, f64>,
    unreadable: HashMap<String, String>,
}

impl ParsedRates {
    fn into_table(self, base: CurrencyCode) -> RateTable {
        RateTable::new(base, self.date, self.rates).with_unreadable(self.unreadable)
    }
}

/// Sépare les entrées numériques des autres (gardées en texte brut)
fn split_rates(entries: Map<String, Value>) -> (HashMap<String, f64>, HashMap<String, String>) {
    let mut rates = HashMap::new();
    let mut unreadable = HashMap::new();

    for (code, value) in entries {
        match value.as_f64() {
            Some(rate) => {
                rates.insert(code, rate);
            }
            None => {
                unreadable.insert(code, value.to_string());
            }
        }
    }

    (rates, unreadable)
}

/// Parse le corps de la réponse en table code -> taux
fn parse_document(body: &str) -> Result<ParsedRates, RateError> {
    // Deux passes : la première garde le message précis de serde_json
    // quand le corps n'est pas du JSON
    let value: Value = serde_json::from_str(body)?;
    let document: RatesDocument = serde_json::from_value(value)?;

    let (base, date, entries) = match document {
        RatesDocument::Full(response) => (
            response.base,
            // Une date illisible n'empêche pas la conversion
            response
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            response.rates,
        ),
        RatesDocument::Bare(entries) => (None, None, entries),
    };

    let (rates, unreadable) = split_rates(entries);
    if !unreadable.is_empty() {
        debug!(count = unreadable.len(), "Ignoring non-numeric rate entries");
    }

    Ok(ParsedRates {
        base,
        date,
        rates,
        unreadable,
    })
}

/// Extrait le taux d'une devise cible depuis un corps de réponse brut
///
/// Équivalent structuré d'une recherche de `"EUR":` dans le texte : le
/// document entier est décodé puis on fait une recherche par clé.
///
/// # Exemple
/// ```
/// use lazyfx::api::extract_rate;
/// use lazyfx::models::CurrencyCode;
///
/// let body = r#"{"EUR":0.9231,"GBP":0.8054}"#;
/// assert_eq!(extract_rate(body, CurrencyCode::GBP), Ok(0.8054));
/// ```
pub fn extract_rate(body: &str, to: CurrencyCode) -> Result<f64, RateError> {
    // La devise de base importe peu pour une simple projection
    let table = parse_document(body)?.into_table(CurrencyCode::default());
    lookup_rate(&table, to)
}

// ============================================================================
// Client HTTP
// ============================================================================

/// Fournisseur de taux basé sur ExchangeRate-API
///
/// CONCEPT : Client réutilisable
/// - reqwest::Client garde un pool de connexions
/// - On le construit une seule fois, avec les timeouts de la config
pub struct ExchangeRateApi {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl ExchangeRateApi {
    /// Crée le client avec la configuration par défaut (API publique)
    pub fn new() -> Result<Self> {
        Self::with_config(ProviderConfig::default())
    }

    /// Crée le client avec une configuration explicite
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        debug!(?config, "Creating HTTP client");
        let client = reqwest::Client::builder()
            .user_agent(concat!("lazyfx/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApi {
    /// Récupère la table des taux pour `base`
    ///
    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec la devise de base
    /// - Tous les logs à l'intérieur portent ce contexte
    #[instrument(name = "fetch_rate_table", skip(self, base), fields(base = %base))]
    async fn fetch_table(&self, base: CurrencyCode) -> Result<RateTable, RateError> {
        let url = self.config.latest_url(base.code());
        debug!(url = %url, "Sending HTTP request to rate provider");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, "Rate provider request failed");
            RateError::from(e)
        })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, "Rate provider returned error status");
            return Err(RateError::NetworkFailure(format!("HTTP {}", status)));
        }

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            RateError::from(e)
        })?;

        debug!(bytes = body.len(), "Parsing JSON response");
        let parsed = parse_document(&body).map_err(|e| {
            error!(error = %e, "Rate provider returned an unreadable body");
            e
        })?;

        if let Some(reported) = parsed.base.as_deref() {
            if reported != base.code() {
                warn!(requested = %base, reported = %reported, "Provider answered with another base currency");
            }
        }

        let table = parsed.into_table(base);
        info!(currencies = table.len(), date = ?table.date, "Successfully fetched rate table");
        Ok(table)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USD_RESPONSE: &str = r#"{
        "provider": "https://www.exchangerate-api.com",
        "base": "USD",
        "date": "2024-05-02",
        "time_last_updated": 1714608001,
        "rates": {
            "USD": 1,
            "EUR": 0.9231,
            "GBP": 0.8054,
            "JPY": 154.62
        }
    }"#;

    async fn mock_server(base: &str, template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/latest/{base}")))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    fn provider_for(server: &MockServer) -> ExchangeRateApi {
        ExchangeRateApi::with_config(ProviderConfig::with_base_url(server.uri()))
            .expect("client HTTP")
    }

    // ------------------------------------------------------------------------
    // extract_rate : parsing du corps
    // ------------------------------------------------------------------------

    #[test]
    fn test_extract_rate_comma_terminated_key() {
        let body = r#"{"base":"USD","rates":{"EUR":0.9231,"GBP":0.8054}}"#;
        assert_eq!(extract_rate(body, CurrencyCode::EUR), Ok(0.9231));

        let body = r#"{"EUR":0.9231,"GBP":0.8054}"#;
        assert_eq!(extract_rate(body, CurrencyCode::EUR), Ok(0.9231));
    }

    #[test]
    fn test_extract_rate_rejects_invalid_json() {
        let body = r#""EUR":0.9231,"GBP":0.8054}"#;
        assert!(matches!(
            extract_rate(body, CurrencyCode::EUR),
            Err(RateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_rate_last_key() {
        let body = r#"{"EUR":0.9231,"GBP":0.8054}"#;
        assert_eq!(extract_rate(body, CurrencyCode::GBP), Ok(0.8054));

        let body = r#"{"rates":{"EUR":0.9231,"GBP": 0.8054 }}"#;
        assert_eq!(extract_rate(body, CurrencyCode::GBP), Ok(0.8054));
    }

    #[test]
    fn test_extract_rate_full_document() {
        assert_eq!(extract_rate(USD_RESPONSE, CurrencyCode::JPY), Ok(154.62));
        assert_eq!(extract_rate(USD_RESPONSE, CurrencyCode::USD), Ok(1.0));
    }

    #[test]
    fn test_extract_rate_missing_key() {
        assert_eq!(
            extract_rate(USD_RESPONSE, CurrencyCode::KRW),
            Err(RateError::RateNotFound("KRW".to_string()))
        );
    }

    #[test]
    fn test_extract_rate_non_numeric_value() {
        let body = r#"{"base":"USD","rates":{"EUR":"abc","GBP":0.8}}"#;
        assert!(matches!(
            extract_rate(body, CurrencyCode::EUR),
            Err(RateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_rate_ignores_other_bad_entries() {
        let body = r#"{"base":"USD","rates":{"EUR":0.9231,"XDR":null,"VES":"n/a"}}"#;
        assert_eq!(extract_rate(body, CurrencyCode::EUR), Ok(0.9231));

        let body = r#"{"result":"success","EUR":0.9231,"GBP":0.8054}"#;
        assert_eq!(extract_rate(body, CurrencyCode::GBP), Ok(0.8054));
    }

    #[test]
    fn test_extract_rate_bare_non_numeric_target() {
        let body = r#"{"result":"success","EUR":null,"GBP":0.8054}"#;
        assert!(matches!(
            extract_rate(body, CurrencyCode::EUR),
            Err(RateError::MalformedResponse(_))
        ));
        assert_eq!(
            extract_rate(body, CurrencyCode::JPY),
            Err(RateError::RateNotFound("JPY".to_string()))
        );
    }

    #[test]
    fn test_extract_rate_keeps_json_error_text() {
        match extract_rate("<html>maintenance</html>", CurrencyCode::EUR) {
            Err(RateError::MalformedResponse(message)) => {
                assert!(!message.contains("untagged"), "{message}");
            }
            other => panic!("réponse invalide attendue, obtenu {other:?}"),
        }
    }

    #[test]
    fn test_extract_rate_ignores_key_in_other_text() {
        // La clé apparaît dans un message, pas dans la table des taux
        let body = r#"{"base":"USD","note":"\"EUR\": 1.5 was yesterday","rates":{"GBP":0.8}}"#;
        assert_eq!(
            extract_rate(body, CurrencyCode::EUR),
            Err(RateError::RateNotFound("EUR".to_string()))
        );
    }

    #[test]
    fn test_parse_document_date() {
        let parsed = parse_document(USD_RESPONSE).unwrap();
        assert_eq!(parsed.base.as_deref(), Some("USD"));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(parsed.rates.len(), 4);
        assert!(parsed.unreadable.is_empty());
    }

    // ------------------------------------------------------------------------
    // ExchangeRateApi : appels HTTP simulés
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_fetch_table_success() {
        let server = mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(USD_RESPONSE),
        )
        .await;
        let provider = provider_for(&server);

        let table = provider.fetch_table(CurrencyCode::USD).await.unwrap();
        assert_eq!(table.base, CurrencyCode::USD);
        assert_eq!(table.rate_for("EUR"), Some(0.9231));
        assert_eq!(table.date, NaiveDate::from_ymd_opt(2024, 5, 2));
    }

    #[tokio::test]
    async fn test_fetch_rate_success() {
        let server = mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(USD_RESPONSE),
        )
        .await;
        let provider = provider_for(&server);

        let rate = provider
            .fetch_rate(CurrencyCode::USD, CurrencyCode::GBP)
            .await
            .expect("taux attendu");
        assert_eq!(rate, 0.8054);
    }

    #[tokio::test]
    async fn test_fetch_rate_not_found() {
        let server = mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(USD_RESPONSE),
        )
        .await;
        let provider = provider_for(&server);

        let result = provider.fetch_rate(CurrencyCode::USD, CurrencyCode::ZAR).await;
        assert_eq!(result, Err(RateError::RateNotFound("ZAR".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_table_http_error() {
        let server = mock_server("USD", ResponseTemplate::new(500)).await;
        let provider = provider_for(&server);

        let result = provider.fetch_table(CurrencyCode::USD).await;
        assert_eq!(
            result,
            Err(RateError::NetworkFailure(
                "HTTP 500 Internal Server Error".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_fetch_table_malformed_body() {
        let server = mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        )
        .await;
        let provider = provider_for(&server);

        let result = provider.fetch_table(CurrencyCode::USD).await;
        assert!(matches!(result, Err(RateError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_table_timeout() {
        let server = mock_server(
            "USD",
            ResponseTemplate::new(200)
                .set_body_string(USD_RESPONSE)
                .set_delay(Duration::from_secs(2)),
        )
        .await;
        let config = ProviderConfig {
            request_timeout: Duration::from_millis(200),
            ..ProviderConfig::with_base_url(server.uri())
        };
        let provider = ExchangeRateApi::with_config(config).unwrap();

        let result = provider.fetch_table(CurrencyCode::USD).await;
        assert!(matches!(result, Err(RateError::NetworkFailure(_))));
    }

    #[tokio::test]
    async fn test_fetch_table_connection_refused() {
        // Port 1 : rien n'écoute en local
        let provider =
            ExchangeRateApi::with_config(ProviderConfig::with_base_url("http://127.0.0.1:1"))
                .unwrap();

        let result = provider.fetch_table(CurrencyCode::USD).await;
        assert!(matches!(result, Err(RateError::NetworkFailure(_))));
    }
}
