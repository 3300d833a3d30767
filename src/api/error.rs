// ============================================================================
// Erreurs du fournisseur de taux
// ============================================================================
// Toutes les erreurs d'I/O et de parsing sont converties ici, à la frontière
// du fournisseur : le convertisseur reçoit un Result, jamais un panic.
// ============================================================================

use thiserror::Error;

/// Échec de récupération d'un taux
///
/// CONCEPT RUST : thiserror
/// - #[error("...")] génère l'implémentation de Display
/// - L'UI affiche un seul message ("taux indisponible") pour les trois cas,
///   le détail reste dans les logs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Connexion refusée, DNS, timeout ou statut HTTP d'erreur
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// La devise cible est absente de la réponse
    #[error("Rate not found for {0}")]
    RateNotFound(String),

    /// Corps illisible, ou valeur du taux non numérique
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connection"
        } else if err.is_status() {
            "status"
        } else {
            "request"
        };
        RateError::NetworkFailure(format!("{} error: {}", kind, err))
    }
}

impl From<serde_json::Error> for RateError {
    fn from(err: serde_json::Error) -> Self {
        RateError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(RateError::from(err), RateError::MalformedResponse(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RateError::RateNotFound("EUR".into()).to_string(),
            "Rate not found for EUR"
        );
    }
}
