// ============================================================================
// Trait : RateProvider
// ============================================================================
// Abstraction du fournisseur de taux : le convertisseur ne connaît que ce
// trait, ce qui permet de le tester avec un faux fournisseur.
//
// CONCEPT RUST : async-trait
// - Les méthodes async dans un trait objet-compatible passent par la macro
//   #[async_trait] (Box<dyn Future> sous le capot)
// - Send + Sync : le fournisseur est utilisé depuis le worker thread
// ============================================================================

use async_trait::async_trait;

use crate::api::RateError;
use crate::models::{CurrencyCode, RateTable};

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Récupère la table complète des taux pour une devise de base
    async fn fetch_table(&self, base: CurrencyCode) -> Result<RateTable, RateError>;

    /// Récupère le taux from -> to
    ///
    /// Implémentation par défaut : une table fraîche par appel, projetée sur
    /// la devise cible puis jetée.
    async fn fetch_rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<f64, RateError> {
        let table = self.fetch_table(from).await?;
        lookup_rate(&table, to)
    }
}

/// Projette une table sur une devise cible
///
/// - Clé absente : RateNotFound
/// - Clé présente mais valeur non numérique : MalformedResponse
/// - Un taux nul, négatif ou non fini est aussi traité comme une réponse invalide
///
/// Seule l'entrée de la devise cible compte : les autres peuvent être
/// illisibles sans conséquence.
pub fn lookup_rate(table: &RateTable, to: CurrencyCode) -> Result<f64, RateError> {
    let Some(rate) = table.rate_for(to.code()) else {
        return Err(match table.unreadable_value(to.code()) {
            Some(raw) => {
                RateError::MalformedResponse(format!("non-numeric rate {} for {}", raw, to))
            }
            None => RateError::RateNotFound(to.code().to_string()),
        });
    };

    if !rate.is_finite() || rate <= 0.0 {
        return Err(RateError::MalformedResponse(format!(
            "invalid rate {} for {}",
            rate, to
        )));
    }

    Ok(rate)
}
