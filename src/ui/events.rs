// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : identifier une touche en une ligne
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (mode live, rafraîchissement)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend max 250ms
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                // Resize, souris, Release : ignorés
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
// Helpers : identifier une touche
// ============================================================================

/// 'q' (quitter, deux fois pour confirmer)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Échap (annule la confirmation de sortie ou efface l'erreur)
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// Tab ou 'l' : onglet suivant
pub fn is_next_tab_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Tab | KeyCode::Char('l'))
    } else {
        false
    }
}

/// Shift+Tab ou 'h' : onglet précédent
pub fn is_previous_tab_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::BackTab | KeyCode::Char('h'))
    } else {
        false
    }
}

/// '1' à '5' : accès direct à un onglet (index à partir de 0)
///
/// CONCEPT RUST : Binding @ sur un intervalle
/// - `c @ '1'..='5'` vérifie l'intervalle et nomme le caractère
pub fn tab_number_from_event(event: &Event) -> Option<usize> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c @ '1'..='5') = key.code {
            return c.to_digit(10).map(|d| d as usize - 1);
        }
    }
    None
}

/// Flèche gauche : recule le curseur de survol
pub fn is_left_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Left)
    } else {
        false
    }
}

/// Flèche droite : avance le curseur de survol
pub fn is_right_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Right)
    } else {
        false
    }
}

/// 'a' : affiche/masque les annotations
pub fn is_annotations_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('a') | KeyCode::Char('A'))
    } else {
        false
    }
}

/// 'i' : affiche/masque le panneau d'insights
pub fn is_insights_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('i') | KeyCode::Char('I'))
    } else {
        false
    }
}

/// Espace : active/désactive le mode live
pub fn is_space_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(' '))
    } else {
        false
    }
}

/// 'r' : recharge les données
pub fn is_reload_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
    } else {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

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
    fn test_tab_navigation() {
        assert!(is_next_tab_event(&key(KeyCode::Tab)));
        assert!(is_next_tab_event(&key(KeyCode::Char('l'))));
        assert!(is_previous_tab_event(&key(KeyCode::BackTab)));
        assert!(is_previous_tab_event(&key(KeyCode::Char('h'))));
        assert!(!is_next_tab_event(&key(KeyCode::Right)));
    }

    #[test]
    fn test_tab_number() {
        assert_eq!(tab_number_from_event(&key(KeyCode::Char('1'))), Some(0));
        assert_eq!(tab_number_from_event(&key(KeyCode::Char('5'))), Some(4));
        assert_eq!(tab_number_from_event(&key(KeyCode::Char('6'))), None);
        assert_eq!(tab_number_from_event(&key(KeyCode::Char('0'))), None);
        assert_eq!(tab_number_from_event(&Event::Tick), None);
    }

    #[test]
    fn test_toggles() {
        assert!(is_annotations_event(&key(KeyCode::Char('a'))));
        assert!(is_insights_event(&key(KeyCode::Char('i'))));
        assert!(is_space_event(&key(KeyCode::Char(' '))));
        assert!(is_reload_event(&key(KeyCode::Char('r'))));
        assert!(is_left_event(&key(KeyCode::Left)));
        assert!(is_right_event(&key(KeyCode::Right)));
        assert!(is_escape_event(&key(KeyCode::Esc)));
    }
}
