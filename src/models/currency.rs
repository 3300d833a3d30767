// ============================================================================
// Enum : CurrencyCode
// ============================================================================
// Liste fermée des devises proposées dans les sélecteurs du formulaire
//
// CONCEPTS RUST :
// 1. Enum unitaire + Copy : une devise se copie comme un entier
// 2. Tableau constant (const ALL) : ordre d'affichage fixé à la compilation
// 3. FromStr / Display : conversion texte <-> type
// ============================================================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Code de devise ISO 4217 supporté par l'application
///
/// L'ordre des variants est l'ordre des sélecteurs : USD est la valeur par
/// défaut (premier élément), HKD le dernier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyCode {
    USD,
    EUR,
    INR,
    GBP,
    JPY,
    AUD,
    CAD,
    CHF,
    CNY,
    ZAR,
    MXN,
    BRL,
    KRW,
    NZD,
    RUB,
    SGD,
    SEK,
    NOK,
    DKK,
    TRY,
    HKD,
}

/// Erreur retournée quand un code ne fait pas partie de la liste
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Devise non supportée : {0}")]
pub struct UnknownCurrency(pub String);

impl CurrencyCode {
    /// Toutes les devises, dans l'ordre des sélecteurs
    ///
    /// CONCEPT RUST : const associée
    /// - Évaluée à la compilation, aucune allocation
    /// - Accessible via CurrencyCode::ALL
    pub const ALL: [CurrencyCode; 21] = [
        CurrencyCode::USD,
        CurrencyCode::EUR,
        CurrencyCode::INR,
        CurrencyCode::GBP,
        CurrencyCode::JPY,
        CurrencyCode::AUD,
        CurrencyCode::CAD,
        CurrencyCode::CHF,
        CurrencyCode::CNY,
        CurrencyCode::ZAR,
        CurrencyCode::MXN,
        CurrencyCode::BRL,
        CurrencyCode::KRW,
        CurrencyCode::NZD,
        CurrencyCode::RUB,
        CurrencyCode::SGD,
        CurrencyCode::SEK,
        CurrencyCode::NOK,
        CurrencyCode::DKK,
        CurrencyCode::TRY,
        CurrencyCode::HKD,
    ];

    /// Code à trois lettres (ex: "USD"), tel qu'attendu par le fournisseur
    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::INR => "INR",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::JPY => "JPY",
            CurrencyCode::AUD => "AUD",
            CurrencyCode::CAD => "CAD",
            CurrencyCode::CHF => "CHF",
            CurrencyCode::CNY => "CNY",
            CurrencyCode::ZAR => "ZAR",
            CurrencyCode::MXN => "MXN",
            CurrencyCode::BRL => "BRL",
            CurrencyCode::KRW => "KRW",
            CurrencyCode::NZD => "NZD",
            CurrencyCode::RUB => "RUB",
            CurrencyCode::SGD => "SGD",
            CurrencyCode::SEK => "SEK",
            CurrencyCode::NOK => "NOK",
            CurrencyCode::DKK => "DKK",
            CurrencyCode::TRY => "TRY",
            CurrencyCode::HKD => "HKD",
        }
    }

    /// Position dans CurrencyCode::ALL
    pub fn index(&self) -> usize {
        // Les variants sont déclarés dans le même ordre que ALL
        *self as usize
    }

    /// Devise suivante dans la liste (boucle après HKD)
    pub fn next(&self) -> CurrencyCode {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Devise précédente dans la liste (boucle avant USD)
    pub fn previous(&self) -> CurrencyCode {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

impl Default for CurrencyCode {
    /// Premier élément du sélecteur
    fn default() -> Self {
        CurrencyCode::ALL[0]
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    /// Parse un code (insensible à la casse, espaces ignorés)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == wanted)
            .ok_or(UnknownCurrency(s.to_string()))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
