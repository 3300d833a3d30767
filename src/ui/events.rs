// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Polling avec timeout : la boucle reste vivante sans touche pressée
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier : permet de relever les résultats du worker
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un tick de 250ms
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                // On ne veut gérer que Press pour éviter les doublons
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),

                // Autres événements (resize, mouse, release...) : un tick suffit
                // pour redessiner
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helper : Convertir KeyEvent en action
// ============================================================================
// CONCEPT RUST : Pattern matching avancé
// - Match sur KeyCode pour identifier la touche
// - Peut aussi matcher sur les modifiers (Ctrl, Alt, Shift)
// ============================================================================

/// Extrait le KeyEvent d'un événement
fn key_of(event: &Event) -> Option<&KeyEvent> {
    match event {
        Event::Key(key) => Some(key),
        Event::Tick => None,
    }
}

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Ctrl+C : quitte immédiatement (le raw mode capture le signal)
pub fn is_force_quit_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| {
        key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
    })
}

/// Vérifie si l'événement est Échap
pub fn is_escape_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Esc))
}

/// Vérifie si l'événement est Entrée (action Convert)
pub fn is_enter_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Enter))
}

/// Vérifie si l'événement est Espace
pub fn is_space_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Char(' ')))
}

/// Champ suivant : Tab ou flèche bas
pub fn is_next_field_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Tab | KeyCode::Down))
}

/// Champ précédent : Shift-Tab ou flèche haut
pub fn is_previous_field_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::BackTab | KeyCode::Up))
}

/// Devise suivante : flèche droite ou 'l' (vim)
pub fn is_next_currency_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Right | KeyCode::Char('l')))
}

/// Devise précédente : flèche gauche ou 'h' (vim)
pub fn is_previous_currency_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Left | KeyCode::Char('h')))
}

/// Vérifie si l'événement est 'c' (action Clear)
pub fn is_clear_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| {
        !key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    })
}

/// Vérifie si l'événement est Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Backspace))
}

/// Caractère accepté dans le champ montant
///
/// Chiffres et ponctuation numérique : la validité du nombre complet
/// ("1,5", "1.2.3", "-") est vérifiée au moment de convertir.
pub fn is_amount_char_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| {
        matches!(key.code, KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+'))
    })
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_of(event)?.code {
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_clear_vs_force_quit() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(is_force_quit_event(&ctrl_c));
        assert!(!is_clear_event(&ctrl_c));

        assert!(is_clear_event(&key(KeyCode::Char('c'))));
        assert!(!is_force_quit_event(&key(KeyCode::Char('c'))));
    }

    #[test]
    fn test_amount_chars() {
        for c in ['0', '9', '.', ',', '-', '+'] {
            assert!(is_amount_char_event(&key(KeyCode::Char(c))), "{c}");
        }
        for c in ['a', 'q', ' ', 'e'] {
            assert!(!is_amount_char_event(&key(KeyCode::Char(c))), "{c}");
        }
        assert_eq!(get_char_from_event(&key(KeyCode::Char('7'))), Some('7'));
        assert_eq!(get_char_from_event(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_next_field_event(&key(KeyCode::Tab)));
        assert!(is_previous_field_event(&key(KeyCode::BackTab)));
        assert!(is_next_currency_event(&key(KeyCode::Right)));
        assert!(is_previous_currency_event(&key(KeyCode::Char('h'))));
    }
}
