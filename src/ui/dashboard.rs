// ============================================================================
// Dashboard - Rendu du convertisseur
// ============================================================================
// Dessine l'écran principal :
//
//   ┌ LazySwap ──────────────────────────┐
//   │ You Pay     : montant + devise     │
//   │ You Receive : résultat + liste     │
//   │ Rates updated / attribution        │
//   │ Raccourcis                         │
//   └────────────────────────────────────┘
//
// CONCEPTS RATATUI :
// 1. Layout : découpage vertical en zones
// 2. List + ListState : liste scrollable qui suit la sélection
// 3. Clear : efface une zone avant d'y dessiner une popup
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen, Theme};
use crate::config::PAYMENT_LINK;
use crate::models::format_price;
use crate::ui::chart;
use crate::ui::theme::Palette;

/// Dessine l'interface complète
///
/// La vue graphique s'affiche en popup par-dessus le convertisseur.
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);

    render_converter(frame, app, &palette);

    match app.current_screen {
        Screen::Converter => {}
        Screen::ChartView => {
            let area = centered_rect(80, 70, frame.size());
            frame.render_widget(Clear, area);
            chart::render_chart(frame, app, &palette, area);
        }
    }
}

fn render_converter(frame: &mut Frame, app: &App, palette: &Palette) {
    let size = frame.size();
    frame.render_widget(Block::default().style(palette.base()), size);

    let chunks = create_layout(size);
    render_header(frame, app, palette, chunks[0]);
    render_pay(frame, app, palette, chunks[1]);
    render_receive(frame, app, palette, chunks[2]);
    render_status(frame, app, palette, chunks[3]);
    render_footer(frame, app, palette, chunks[4]);
}

/// Header, You Pay, You Receive, statut, footer
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(8),
            Constraint::Length(2),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" LazySwap ")
        .title_alignment(Alignment::Center);

    let theme_icon = match app.theme {
        Theme::Light => "☀",
        Theme::Dark => "☾",
    };

    let mut spans = vec![
        Span::styled("📈 Live Rates", palette.label()),
        Span::raw("   "),
        Span::styled(theme_icon, Style::default().fg(palette.muted)),
    ];
    if app.is_loading {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            "⟳ Refreshing...",
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// You Pay
// ============================================================================

fn render_pay(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(" YOU PAY ", palette.label()));

    let amount = if app.amount.is_empty() { "0" } else { app.amount.as_str() };
    let cursor = if app.is_on_converter() { "█" } else { "" };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                amount.to_string(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(cursor, Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::raw("   "),
            Span::styled("◀ ", Style::default().fg(palette.muted)),
            Span::styled(app.fiat.code(), palette.label()),
            Span::styled(" ▶", Style::default().fg(palette.muted)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} {}", app.fiat.flag(), app.fiat.name()),
            Style::default().fg(palette.muted),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ============================================================================
// You Receive
// ============================================================================

fn render_receive(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(" YOU RECEIVE ", palette.label()));

    // Premier chargement : rien à montrer encore
    if app.is_loading && app.selected_asset().is_none() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Loading market data...",
                Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    // Erreur du listing : le panneau remplace la vue
    // (liste et sélection restent intactes dans App)
    if let Some(error) = &app.error {
        render_error_panel(frame, error, palette, block, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner)
        .to_vec();

    render_conversion(frame, app, palette, chunks[0]);
    render_asset_list(frame, app, palette, chunks[1]);
}

fn render_error_panel(frame: &mut Frame, error: &str, palette: &Palette, block: Block, area: Rect) {
    let block = block.border_style(Style::default().fg(palette.error));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("⚠ {}", error),
            Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r]", palette.key()),
            Span::raw(" Try again"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Résultat de conversion + prix courant
fn render_conversion(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let ticker = app.selected_asset().map(|a| a.ticker()).unwrap_or_default();

    let mut lines = vec![Line::from(vec![
        Span::styled(
            app.conversion(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(ticker, palette.label()),
    ])];

    if let Some(asset) = app.selected_asset() {
        lines.push(Line::from(vec![
            Span::styled("ⓘ Current Price  ", Style::default().fg(palette.muted)),
            Span::styled(
                format!(
                    "1 {} = {}{}",
                    asset.ticker(),
                    app.fiat.symbol(),
                    format_price(asset.current_price)
                ),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Liste des actifs, la sélection reste visible en scrollant
fn render_asset_list(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let items: Vec<ListItem> = app
        .assets
        .iter()
        .map(|asset| {
            let price = format!("{}{}", app.fiat.symbol(), format_price(asset.current_price));
            ListItem::new(format!(" {:<32} {:>18}", asset.label(), price))
                .style(Style::default().fg(palette.text))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(palette.muted))
                .title(Span::styled(
                    format!(" {} assets ", app.assets.len()),
                    Style::default().fg(palette.muted),
                )),
        )
        .highlight_style(
            Style::default()
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶");

    let mut state = ListState::default();
    state.select(app.selected_index);

    frame.render_stateful_widget(list, area, &mut state);
}

// ============================================================================
// Statut : heure de mise à jour + source
// ============================================================================

fn render_status(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let updated = match app.last_updated {
        Some(time) => format!("Rates updated: {}", time.format("%H:%M:%S")),
        None => "Connecting to market...".to_string(),
    };

    let lines = vec![
        Line::from(Span::styled(updated, Style::default().fg(palette.muted))),
        Line::from(Span::styled(
            "Data provided by CoinGecko API • Top 100 Cryptos (No Stablecoins)",
            Style::default().fg(palette.muted).add_modifier(Modifier::DIM),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

// ============================================================================
// Footer : raccourcis clavier
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Press ", palette.key()),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                palette.key(),
            ),
        ])
    } else if app.show_payment_link {
        Line::from(vec![
            Span::styled("♥ Donate: ", Style::default().fg(palette.negative)),
            Span::styled(PAYMENT_LINK, Style::default().add_modifier(Modifier::UNDERLINED)),
            Span::raw("  "),
            Span::styled("[p]", palette.key()),
            Span::raw(" Hide"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[0-9 .]", palette.key()),
            Span::raw(" Amount  "),
            Span::styled("[←→]", palette.key()),
            Span::raw(" Fiat  "),
            Span::styled("[↑↓]", palette.key()),
            Span::raw(" Asset  "),
            Span::styled("[Enter]", palette.key()),
            Span::raw(" Chart  "),
            Span::styled("[r]", palette.key()),
            Span::raw(" Refresh  "),
            Span::styled("[t]", palette.key()),
            Span::raw(" Theme  "),
            Span::styled("[p]", palette.key()),
            Span::raw(" Donate  "),
            Span::styled("[q]", palette.key()),
            Span::raw(" Quit"),
        ])
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Rectangle centré occupant `percent_x` × `percent_y` de `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

// ============================================================================
// Tests : rendu sur un terminal virtuel
// ============================================================================
