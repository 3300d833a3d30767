// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global du formulaire de conversion
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Encapsulation : l'UI lit App, seules les méthodes de App le modifient
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Le rendu lit depuis App
// - Les événements clavier et les résultats du worker passent par App
// - Garantit la cohérence de l'état (une seule conversion en cours)
// ============================================================================

use tracing::{debug, info};

use crate::converter::ConversionError;
use crate::models::{ConversionRequest, ConversionResult, CurrencyCode, EMPTY_RESULT};

// ============================================================================
// Enum : Field
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul champ du formulaire a le focus à la fois
// - Tab / ↓ : champ suivant, Shift-Tab / ↑ : champ précédent
// ============================================================================

/// Champs du formulaire, dans l'ordre d'affichage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Sélecteur de la devise source
    From,

    /// Sélecteur de la devise cible
    To,

    /// Saisie du montant
    Amount,
}

impl Field {
    /// Champ suivant (boucle)
    pub fn next(&self) -> Field {
        match self {
            Field::From => Field::To,
            Field::To => Field::Amount,
            Field::Amount => Field::From,
        }
    }

    /// Champ précédent (boucle)
    pub fn previous(&self) -> Field {
        match self {
            Field::From => Field::Amount,
            Field::To => Field::From,
            Field::Amount => Field::To,
        }
    }

    /// Libellé affiché à gauche du champ
    pub fn label(&self) -> &'static str {
        match self {
            Field::From => "From Currency:",
            Field::To => "To Currency:",
            Field::Amount => "Amount:",
        }
    }
}

/// Message modal affiché par-dessus le formulaire
///
/// CONCEPT : Modal dialog
/// - Tant qu'une popup est ouverte, les touches servent seulement à la fermer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
}

impl Popup {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&ConversionError> for Popup {
    fn from(err: &ConversionError) -> Self {
        Popup::new(err.title(), err.to_string())
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Devise source sélectionnée
    pub from: CurrencyCode,

    /// Devise cible sélectionnée
    pub to: CurrencyCode,

    /// Texte brut du champ montant (validé seulement au moment de convertir)
    pub amount_input: String,

    /// Texte du champ résultat ("0.00" tant qu'aucune conversion n'a réussi)
    pub result_text: String,

    /// Champ qui a le focus
    pub focused: Field,

    /// Indique si une conversion est en cours
    /// CONCEPT : Background loading state
    /// - true : l'action Convert est désactivée, un indicateur s'affiche
    /// - false : formulaire interactif normal
    pub is_loading: bool,

    /// Message de chargement optionnel
    pub loading_message: Option<String>,

    /// Popup modale ouverte (erreur de saisie ou taux indisponible)
    pub popup: Option<Popup>,

    /// Ligne récapitulative de la dernière conversion réussie
    pub status: Option<String>,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false (quit réel)
    /// - N'importe quelle autre touche : confirm_quit = false (annulation)
    pub confirm_quit: bool,

    /// Identifiant de la demande en cours
    ///
    /// Incrémenté à chaque conversion et à chaque Clear : un résultat qui
    /// arrive avec un ancien identifiant est ignoré.
    request_id: u64,
}

impl App {
    /// Crée une nouvelle instance de App avec le formulaire vide
    ///
    /// CONCEPT RUST : Constructor pattern
    /// - Convention : fonction associée nommée "new()"
    /// - Retourne Self (alias pour le type App)
    pub fn new() -> Self {
        Self {
            running: true,
            from: CurrencyCode::default(),
            to: CurrencyCode::default(),
            amount_input: String::new(),
            result_text: EMPTY_RESULT.to_string(),
            focused: Field::From,
            is_loading: false,
            loading_message: None,
            popup: None,
            status: None,
            confirm_quit: false,
            request_id: 0,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Navigation dans le formulaire
    // ========================================================================

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
    }

    /// Devise suivante dans le sélecteur qui a le focus
    ///
    /// Sans effet si le focus est sur le montant.
    pub fn next_currency(&mut self) {
        match self.focused {
            Field::From => self.from = self.from.next(),
            Field::To => self.to = self.to.next(),
            Field::Amount => {}
        }
    }

    /// Devise précédente dans le sélecteur qui a le focus
    pub fn previous_currency(&mut self) {
        match self.focused {
            Field::From => self.from = self.from.previous(),
            Field::To => self.to = self.to.previous(),
            Field::Amount => {}
        }
    }

    /// Ajoute un caractère au champ montant (si c'est lui qui a le focus)
    pub fn append_char(&mut self, c: char) {
        if self.focused == Field::Amount {
            self.amount_input.push(c);
        }
    }

    /// Supprime le dernier caractère du champ montant
    pub fn backspace(&mut self) {
        if self.focused == Field::Amount {
            self.amount_input.pop();
        }
    }

    // ========================================================================
    // Actions Convert / Clear
    // ========================================================================

    /// Démarre une conversion
    ///
    /// CONCEPT : Validation côté UI
    /// - Le montant est validé ici, sur le thread UI
    /// - En cas d'erreur : popup, aucune commande envoyée au worker
    /// - En cas de succès : passe en chargement et retourne la demande
    ///   (avec son identifiant) à envoyer au worker
    ///
    /// Retourne None si une conversion est déjà en cours (action désactivée).
    pub fn start_conversion(&mut self) -> Option<(u64, ConversionRequest)> {
        if self.is_loading {
            debug!("Convert ignored: a conversion is already in flight");
            return None;
        }

        match ConversionRequest::parse(&self.amount_input, self.from, self.to) {
            Ok(request) => {
                self.request_id += 1;
                self.start_loading(Some(format!(
                    "Fetching {} -> {} rate...",
                    request.from, request.to
                )));
                Some((self.request_id, request))
            }
            Err(e) => {
                info!(input = %self.amount_input, error = %e, "Invalid amount");
                let err = ConversionError::from(e);
                self.fail(&err);
                None
            }
        }
    }

    /// Applique le résultat renvoyé par le worker
    ///
    /// Les résultats d'une demande annulée (Clear entre-temps) sont ignorés.
    pub fn finish_conversion(
        &mut self,
        id: u64,
        outcome: Result<ConversionResult, ConversionError>,
    ) {
        if id != self.request_id || !self.is_loading {
            debug!(id, current = self.request_id, "Ignoring stale conversion result");
            return;
        }

        self.stop_loading();

        match outcome {
            Ok(result) => {
                self.result_text = result.display();
                self.status = Some(result.summary());
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Identifiant de la dernière demande émise
    pub fn current_request_id(&self) -> u64 {
        self.request_id
    }

    /// Réinitialise le formulaire
    ///
    /// Montant vide, résultat "0.00", sélecteurs sur leur premier élément.
    /// Une conversion en cours est abandonnée (son résultat sera ignoré).
    pub fn clear(&mut self) {
        self.amount_input.clear();
        self.result_text = EMPTY_RESULT.to_string();
        self.from = CurrencyCode::default();
        self.to = CurrencyCode::default();
        self.status = None;

        if self.is_loading {
            self.request_id += 1;
            self.stop_loading();
        }
    }

    /// Affiche une erreur : seul le champ résultat est remis à zéro
    fn fail(&mut self, err: &ConversionError) {
        self.result_text = EMPTY_RESULT.to_string();
        self.status = Some(err.detail());
        self.popup = Some(Popup::from(err));
    }

    // ========================================================================
    // Loading / Popup / Quit
    // ========================================================================

    /// Démarre le chargement avec un message optionnel
    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    /// Termine le chargement
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    /// Vérifie si une conversion est en cours
    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }

    pub fn is_showing_popup(&self) -> bool {
        self.popup.is_some()
    }

    pub fn dismiss_popup(&mut self) {
        self.popup = None;
    }

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// ============================================================================
// Trait Default
// ============================================================================
// Convention Rust : si new() ne prend pas de paramètres, implémenter Default
// ============================================================================

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RateError;

    fn type_amount(app: &mut App, text: &str) {
        app.focused = Field::Amount;
        for c in text.chars() {
            app.append_char(c);
        }
    }

    fn successful_result(amount: f64, rate: f64) -> ConversionResult {
        let request = ConversionRequest::new(amount, CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        ConversionResult::new(request, rate)
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.from, CurrencyCode::USD);
        assert_eq!(app.to, CurrencyCode::USD);
        assert!(app.amount_input.is_empty());
        assert_eq!(app.result_text, "0.00");
        assert_eq!(app.focused, Field::From);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = App::new();
        app.focus_next();
        assert_eq!(app.focused, Field::To);
        app.focus_next();
        assert_eq!(app.focused, Field::Amount);
        app.focus_next();
        assert_eq!(app.focused, Field::From);
        app.focus_previous();
        assert_eq!(app.focused, Field::Amount);
    }

    #[test]
    fn test_currency_selection_follows_focus() {
        let mut app = App::new();

        app.next_currency();
        assert_eq!(app.from, CurrencyCode::EUR);
        assert_eq!(app.to, CurrencyCode::USD);

        app.focus_next();
        app.previous_currency();
        assert_eq!(app.to, CurrencyCode::HKD);

        app.focus_next();
        app.next_currency();
        assert_eq!(app.from, CurrencyCode::EUR);
        assert_eq!(app.to, CurrencyCode::HKD);
    }

    #[test]
    fn test_typing_only_in_amount_field() {
        let mut app = App::new();
        app.append_char('1');
        assert!(app.amount_input.is_empty());

        type_amount(&mut app, "12.5");
        assert_eq!(app.amount_input, "12.5");
        app.backspace();
        assert_eq!(app.amount_input, "12.");
    }

    #[test]
    fn test_invalid_amount_shows_popup_without_request() {
        let mut app = App::new();
        type_amount(&mut app, "1,5");

        assert!(app.start_conversion().is_none());
        assert!(!app.is_loading_data());
        let popup = app.popup.clone().expect("popup attendue");
        assert_eq!(popup.message, "Please enter a valid number.");
        assert_eq!(app.amount_input, "1,5");
    }

    #[test]
    fn test_non_positive_amount_shows_popup() {
        let mut app = App::new();
        type_amount(&mut app, "-5");

        assert!(app.start_conversion().is_none());
        assert_eq!(
            app.popup.as_ref().map(|p| p.message.as_str()),
            Some("Please enter a positive amount.")
        );

        app.dismiss_popup();
        assert!(!app.is_showing_popup());
    }

    #[test]
    fn test_convert_disabled_while_loading() {
        let mut app = App::new();
        type_amount(&mut app, "100");

        let (id, request) = app.start_conversion().expect("demande attendue");
        assert_eq!(request.amount(), 100.0);
        assert!(app.is_loading_data());
        assert!(app.start_conversion().is_none());

        app.finish_conversion(id, Ok(successful_result(100.0, 0.85)));
        assert!(!app.is_loading_data());
        assert_eq!(app.result_text, "85.00");
        assert!(app.start_conversion().is_some());
    }

    #[test]
    fn test_rate_failure_keeps_form() {
        let mut app = App::new();
        app.next_currency();
        type_amount(&mut app, "10");

        let (id, _) = app.start_conversion().unwrap();
        app.finish_conversion(
            id,
            Err(ConversionError::RateUnavailable(RateError::NetworkFailure(
                "timeout".into(),
            ))),
        );

        assert!(!app.is_loading_data());
        assert_eq!(app.from, CurrencyCode::EUR);
        assert_eq!(app.amount_input, "10");
        assert_eq!(app.result_text, "0.00");
        assert_eq!(
            app.popup.as_ref().map(|p| p.message.as_str()),
            Some("Unable to fetch conversion rate.")
        );
    }

    #[test]
    fn test_clear_after_success() {
        let mut app = App::new();
        app.next_currency();
        app.focus_next();
        app.next_currency();
        app.next_currency();
        type_amount(&mut app, "100");

        let (id, _) = app.start_conversion().unwrap();
        app.finish_conversion(id, Ok(successful_result(100.0, 0.85)));
        assert_eq!(app.result_text, "85.00");

        app.clear();
        assert!(app.amount_input.is_empty());
        assert_eq!(app.result_text, "0.00");
        assert_eq!(app.from, CurrencyCode::USD);
        assert_eq!(app.to, CurrencyCode::USD);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_clear_discards_in_flight_result() {
        let mut app = App::new();
        type_amount(&mut app, "100");

        let (id, _) = app.start_conversion().unwrap();
        app.clear();
        assert!(!app.is_loading_data());

        app.finish_conversion(id, Ok(successful_result(100.0, 0.85)));
        assert_eq!(app.result_text, "0.00");
    }
}
