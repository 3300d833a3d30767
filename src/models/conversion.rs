// ============================================================================
// Structures : ConversionRequest / ConversionResult
// ============================================================================
// Une demande de conversion validée et son résultat
//
// CONCEPTS RUST :
// 1. Validation à la construction : une ConversionRequest existe
//    seulement si le montant est valide (parse, don't validate)
// 2. thiserror : enum d'erreurs typées avec messages Display
// ============================================================================

use thiserror::Error;

use crate::models::CurrencyCode;

/// Texte affiché dans le champ résultat quand aucune conversion n'a eu lieu
pub const EMPTY_RESULT: &str = "0.00";

/// Raisons pour lesquelles un montant saisi est refusé
///
/// Les deux cas sont détectés avant tout appel réseau.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Le texte n'est pas un nombre décimal fini
    #[error("Please enter a valid number.")]
    InvalidNumber(String),

    /// Le nombre est nul ou négatif
    #[error("Please enter a positive amount.")]
    NonPositiveAmount,
}

/// Demande de conversion : montant strictement positif + paire de devises
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Devise de base (celle du montant)
    pub from: CurrencyCode,

    /// Devise cible
    pub to: CurrencyCode,

    /// Montant, toujours > 0
    amount: f64,
}

impl ConversionRequest {
    /// Construit une demande à partir d'un montant déjà numérique
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Result<Self, AmountError> {
        if !amount.is_finite() {
            return Err(AmountError::InvalidNumber(amount.to_string()));
        }
        if amount <= 0.0 {
            return Err(AmountError::NonPositiveAmount);
        }
        Ok(Self { from, to, amount })
    }

    /// Valide le texte saisi par l'utilisateur
    ///
    /// CONCEPT RUST : str::parse::<f64>()
    /// - Accepte "inf" et "NaN" : on les rejette explicitement via is_finite()
    /// - Les espaces autour du texte sont ignorés
    pub fn parse(
        amount_text: &str,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Self, AmountError> {
        let trimmed = amount_text.trim();
        let amount: f64 = trimmed
            .parse()
            .map_err(|_| AmountError::InvalidNumber(trimmed.to_string()))?;

        Self::new(amount, from, to)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// Résultat d'une conversion réussie
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub request: ConversionRequest,

    /// Taux utilisé (1 unité de `from` = `rate` unités de `to`)
    pub rate: f64,

    /// Montant converti, non arrondi
    pub value: f64,
}

impl ConversionResult {
    pub fn new(request: ConversionRequest, rate: f64) -> Self {
        let value = convert(request.amount(), rate);
        Self {
            request,
            rate,
            value,
        }
    }

    /// Montant converti avec exactement deux décimales (ex: "85.00")
    pub fn display(&self) -> String {
        format_amount(self.value)
    }

    /// Ligne récapitulative pour la barre d'état
    ///
    /// Format : "100.00 USD = 85.00 EUR (1 USD = 0.8500 EUR)"
    pub fn summary(&self) -> String {
        format!(
            "{} {} = {} {} (1 {} = {:.4} {})",
            format_amount(self.request.amount()),
            self.request.from,
            self.display(),
            self.request.to,
            self.request.from,
            self.rate,
            self.request.to
        )
    }
}

/// Applique le taux au montant
pub fn convert(amount: f64, rate: f64) -> f64 {
    amount * rate
}

/// Formatage à deux décimales utilisé partout dans l'UI
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_amount() {
        let request = ConversionRequest::parse(" 100 ", CurrencyCode::USD, CurrencyCode::EUR)
            .expect("montant valide");
        assert_eq!(request.amount(), 100.0);
        assert_eq!(request.from, CurrencyCode::USD);
        assert_eq!(request.to, CurrencyCode::EUR);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for text in ["", "abc", "12,5", "1.2.3", "-", "inf", "NaN"] {
            let result = ConversionRequest::parse(text, CurrencyCode::USD, CurrencyCode::EUR);
            assert!(
                matches!(result, Err(AmountError::InvalidNumber(_))),
                "{text:?} devrait être refusé"
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        for text in ["0", "-5", "-0.01", "0.0"] {
            let result = ConversionRequest::parse(text, CurrencyCode::USD, CurrencyCode::EUR);
            assert_eq!(result, Err(AmountError::NonPositiveAmount));
        }
    }

    #[test]
    fn test_result_display_two_decimals() {
        let request = ConversionRequest::new(100.0, CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        let result = ConversionResult::new(request, 0.85);
        assert_eq!(result.display(), "85.00");
    }

    #[test]
    fn test_result_display_rounds() {
        let request = ConversionRequest::new(3.0, CurrencyCode::USD, CurrencyCode::JPY).unwrap();
        let result = ConversionResult::new(request, 0.3333);
        assert_eq!(result.display(), "1.00");

        let request = ConversionRequest::new(10.0, CurrencyCode::USD, CurrencyCode::INR).unwrap();
        let result = ConversionResult::new(request, 83.4567);
        assert_eq!(result.display(), "834.57");
    }

    #[test]
    fn test_summary() {
        let request = ConversionRequest::new(100.0, CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        let result = ConversionResult::new(request, 0.85);
        assert_eq!(result.summary(), "100.00 USD = 85.00 EUR (1 USD = 0.8500 EUR)");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AmountError::InvalidNumber("x".into()).to_string(),
            "Please enter a valid number."
        );
        assert_eq!(
            AmountError::NonPositiveAmount.to_string(),
            "Please enter a positive amount."
        );
    }
}
