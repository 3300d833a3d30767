// ============================================================================
// Structure : RateTable
// ============================================================================
// Table des taux d'une devise de base, à un instant donné
//
// Une table est créée pour une seule conversion puis jetée : pas de cache,
// pas de réutilisation entre deux demandes.
// ============================================================================

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::CurrencyCode;

/// Taux de change relatifs à une devise de base
///
/// 1 unité de `base` = `rates[code]` unités de `code`
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    /// Devise de base de la table
    pub base: CurrencyCode,

    /// Date de publication annoncée par le fournisseur (si fournie)
    pub date: Option<NaiveDate>,

    /// Code devise -> taux (contient aussi les devises hors de notre liste)
    rates: HashMap<String, f64>,

    /// Entrées présentes mais non numériques : code -> valeur brute
    ///
    /// Une entrée illisible ne rend invalide que sa propre devise.
    unreadable: HashMap<String, String>,
}

impl RateTable {
    pub fn new(base: CurrencyCode, date: Option<NaiveDate>, rates: HashMap<String, f64>) -> Self {
        Self {
            base,
            date,
            rates,
            unreadable: HashMap::new(),
        }
    }

    /// Ajoute les entrées dont la valeur n'est pas un nombre
    pub fn with_unreadable(mut self, unreadable: HashMap<String, String>) -> Self {
        self.unreadable = unreadable;
        self
    }

    /// Taux pour une devise cible, None si le fournisseur ne la connaît pas
    /// (ou si sa valeur n'est pas un nombre)
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Valeur brute d'une entrée présente mais non numérique
    pub fn unreadable_value(&self, code: &str) -> Option<&str> {
        self.unreadable.get(code).map(String::as_str)
    }

    /// Nombre de devises présentes dans la table
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
