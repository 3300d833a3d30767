// ============================================================================
// Configuration du fournisseur de taux
// ============================================================================
// Valeurs figées à la compilation : aucune variable d'environnement ni
// fichier n'est lu. La structure existe pour que les tests puissent pointer
// le client vers un serveur local.
// ============================================================================

use std::time::Duration;

/// URL de l'API publique ExchangeRate-API
pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com";

/// Timeout d'établissement de la connexion
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout global de la requête (connexion + lecture du corps)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Paramètres du client HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Racine de l'API, sans slash final (ex: "https://api.exchangerate-api.com")
    pub base_url: String,

    pub connect_timeout: Duration,

    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Configuration par défaut avec une autre racine d'API
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// URL de la table des taux pour une devise de base
    ///
    /// Format : {base_url}/v4/latest/{base}
    pub fn latest_url(&self, base: &str) -> String {
        format!("{}/v4/latest/{}", self.base_url.trim_end_matches('/'), base)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
