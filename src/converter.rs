// ============================================================================
// Converter : validation -> taux -> multiplication -> formatage
// ============================================================================
// Seul composant "métier" de l'application.
//
// Machine à états d'une demande :
//   idle -> validating -> fetching -> done | error
// Pas de retry, pas d'annulation : chaque demande aboutit à exactement une
// issue.
//
// CONCEPTS RUST :
// 1. Générique sur un trait (P: RateProvider) : testable avec un faux
// 2. Erreurs typées : la validation échoue AVANT tout appel réseau
// ============================================================================

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{RateError, RateProvider};
use crate::models::{AmountError, ConversionRequest, ConversionResult, CurrencyCode};

/// Issue en échec d'une conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Montant non numérique ou non positif (aucun appel réseau effectué)
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    /// Le fournisseur n'a pas pu donner de taux
    #[error("Unable to fetch conversion rate.")]
    RateUnavailable(#[source] RateError),
}

impl ConversionError {
    /// Titre de la popup affichée à l'utilisateur
    pub fn title(&self) -> &'static str {
        match self {
            ConversionError::InvalidAmount(_) => "Invalid amount",
            ConversionError::RateUnavailable(_) => "Rate unavailable",
        }
    }

    /// Détail technique, pour les logs et la barre d'état
    pub fn detail(&self) -> String {
        match self {
            ConversionError::InvalidAmount(AmountError::InvalidNumber(text)) => {
                format!("'{}' is not a number", text)
            }
            ConversionError::InvalidAmount(AmountError::NonPositiveAmount) => {
                "amount must be greater than zero".to_string()
            }
            ConversionError::RateUnavailable(source) => source.to_string(),
        }
    }
}

/// Convertisseur de montants
///
/// CONCEPT RUST : Généricité statique
/// - Converter<ExchangeRateApi> en production
/// - Converter<MockProvider> dans les tests
/// - Pas de Box<dyn>, le compilateur monomorphise
pub struct Converter<P: RateProvider> {
    provider: P,
}

impl<P: RateProvider> Converter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Valide le texte saisi puis convertit
    pub async fn convert_input(
        &self,
        amount_text: &str,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<ConversionResult, ConversionError> {
        let request = ConversionRequest::parse(amount_text, from, to).map_err(|e| {
            debug!(input = %amount_text, error = %e, "Rejected amount before any network call");
            e
        })?;

        self.convert(request).await
    }

    /// Convertit une demande déjà validée (un seul appel au fournisseur)
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        debug!(from = %request.from, to = %request.to, amount = request.amount(), "Fetching conversion rate");

        let rate = self
            .provider
            .fetch_rate(request.from, request.to)
            .await
            .map_err(|e| {
                warn!(from = %request.from, to = %request.to, error = %e, "Conversion rate unavailable");
                ConversionError::RateUnavailable(e)
            })?;

        let result = ConversionResult::new(request, rate);
        info!(summary = %result.summary(), "Conversion done");
        Ok(result)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
