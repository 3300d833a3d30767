// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le fournisseur de taux de change : le trait
// RateProvider, sa configuration, ses erreurs et le client HTTP
// ExchangeRate-API.
// ============================================================================

pub mod config;        // URL et timeouts
pub mod error;         // RateError
pub mod exchange_rate; // Client ExchangeRate-API
pub mod provider;      // Trait RateProvider

// Re-export des éléments principaux
pub use config::ProviderConfig;
pub use error::RateError;
pub use exchange_rate::{extract_rate, ExchangeRateApi};
pub use provider::{lookup_rate, RateProvider};
