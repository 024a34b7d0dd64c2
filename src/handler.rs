// ============================================================================
// Gestion des événements → transitions de App
// ============================================================================
// CONCEPT : Event Handler Pattern
// - Traduit une touche en appel de méthode sur App
// - Retourne la commande de fetch éventuelle, que la boucle principale
//   envoie au worker
// - Les guards (if) rendent les touches contextuelles à l'écran actif
// ============================================================================

use tracing::{debug, info};

use crate::app::{App, AppCommand};
use crate::ui::events::{
    get_char_from_event, is_amount_char_event, is_backspace_event, is_chart_event,
    is_down_event, is_escape_event, is_force_quit_event, is_next_fiat_event,
    is_payment_link_event, is_previous_fiat_event, is_quit_event, is_refresh_event,
    is_theme_event, is_up_event, Event,
};

/// Traite un événement et met à jour l'état de l'application
pub fn handle_event(app: &mut App, event: Event) -> Option<AppCommand> {
    if let Event::Tick = event {
        return None;
    }

    if is_force_quit_event(&event) {
        info!("User force quit (Ctrl+C)");
        app.quit();
        return None;
    }

    if is_quit_event(&event) {
        // Two-step : première pression → confirmation, deuxième → quit
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return None;
    }

    // Toute autre touche annule la confirmation de quit
    app.cancel_quit();

    match event {
        // ESC : retour au convertisseur depuis la vue graphique
        _ if is_escape_event(&event) && app.is_on_chart() => {
            app.close_chart();
            None
        }

        _ if is_chart_event(&event) && app.is_on_converter() => app.open_chart(),

        // Navigation dans la liste : active sur les deux écrans,
        // la vue graphique recharge l'historique du nouvel actif
        _ if is_up_event(&event) => app.previous_asset(),
        _ if is_down_event(&event) => app.next_asset(),

        _ if is_next_fiat_event(&event) => app.next_fiat(),
        _ if is_previous_fiat_event(&event) => app.previous_fiat(),

        _ if is_refresh_event(&event) => app.refresh(),

        _ if is_theme_event(&event) => {
            app.toggle_theme();
            debug!(theme = ?app.theme, "Theme toggled");
            None
        }

        _ if is_payment_link_event(&event) => {
            app.toggle_payment_link();
            None
        }

        // Édition du montant : uniquement sur le convertisseur
        _ if is_amount_char_event(&event) && app.is_on_converter() => {
            if let Some(c) = get_char_from_event(&event) {
                app.push_amount_char(c);
            }
            None
        }

        _ if is_backspace_event(&event) && app.is_on_converter() => {
            app.pop_amount_char();
            None
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::app::AppResult;
    use crate::models::{Asset, FiatCurrency};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn loaded_app() -> App {
        let mut app = App::default();
        let token = match app.start() {
            AppCommand::FetchListing { token, .. } => token,
            other => panic!("unexpected {:?}", other),
        };
        app.apply_result(AppResult::ListingLoaded {
            token,
            assets: vec![
                Asset::new("bitcoin", "Bitcoin", "btc", 50_000.0),
                Asset::new("solana", "Solana", "sol", 100.0),
            ],
        });
        app
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::default();
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.is_running());
        assert!(app.is_awaiting_quit_confirmation());

        // Une autre touche annule
        handle_event(&mut app, key(KeyCode::Char('1')));
        assert!(!app.is_awaiting_quit_confirmation());

        handle_event(&mut app, key(KeyCode::Char('q')));
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_typing_amount() {
        let mut app = loaded_app();
        for c in ['2', '5', '.', '.', '0'] {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.amount, "25.0");

        handle_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.amount, "25.");
        // 25 / 50000 = 0.0005 → palier 6 décimales
        assert_eq!(app.conversion(), "0.000500");
    }

    #[test]
    fn test_fiat_keys_issue_listing_fetch() {
        let mut app = loaded_app();
        let command = handle_event(&mut app, key(KeyCode::Right));
        assert!(matches!(command, Some(AppCommand::FetchListing { fiat: FiatCurrency::Sgd, .. })));
        assert_eq!(app.fiat, FiatCurrency::Sgd);
    }

    #[test]
    fn test_chart_keys() {
        let mut app = loaded_app();
        let command = handle_event(&mut app, key(KeyCode::Enter));
        assert!(matches!(command, Some(AppCommand::FetchChart { .. })));
        assert!(app.is_on_chart());

        // Sur la vue graphique, les chiffres n'éditent pas le montant
        handle_event(&mut app, key(KeyCode::Char('9')));
        assert_eq!(app.amount, "0");

        handle_event(&mut app, key(KeyCode::Esc));
        assert!(app.is_on_converter());
    }

    #[test]
    fn test_tick_does_nothing() {
        let mut app = loaded_app();
        assert!(handle_event(&mut app, Event::Tick).is_none());
    }
}
