// ============================================================================
// LazyFx - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Fournisseur de taux (ExchangeRate-API)
pub mod app;       // État du formulaire
pub mod converter; // Validation + conversion
pub mod models;    // Structures de données
pub mod ui;        // Interface utilisateur
