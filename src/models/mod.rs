// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod conversion; // Demande et résultat de conversion
pub mod currency;   // Liste des devises supportées
pub mod rate_table; // Table des taux d'une devise de base

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyfx::models::currency::CurrencyCode;
// On peut faire : use lazyfx::models::CurrencyCode;
pub use conversion::{
    format_amount, AmountError, ConversionRequest, ConversionResult, EMPTY_RESULT,
};
pub use currency::{CurrencyCode, UnknownCurrency};
pub use rate_table::RateTable;
