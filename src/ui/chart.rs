// ============================================================================
// Chart - Tendance 7 jours de l'actif sélectionné
// ============================================================================
// Popup affichée par-dessus le convertisseur :
//   - header : nom de l'actif, "Last 7 Days Trend", variation
//   - graphique ligne (ratatui Chart) ou indicateur de chargement
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de points (x, y)
// 3. Axis : bornes et labels des axes
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{format_price, Asset, ChartSeries, FiatCurrency, CHART_WINDOW_DAYS};
use crate::ui::theme::Palette;

/// Dessine la popup graphique pour l'actif sélectionné
pub fn render_chart(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let asset = match app.selected_asset() {
        Some(asset) => asset,
        None => {
            render_message(frame, palette, area, "No asset selected");
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Titre
            Constraint::Min(0),    // Graphique
        ])
        .split(area)
        .to_vec();

    render_chart_header(frame, app, asset, palette, chunks[0]);

    match &app.chart {
        Some(series) if !series.is_empty() => {
            render_chart_graph(frame, series, app.fiat, palette, chunks[1]);
        }
        // Chargement en cours, ou échec silencieux (zone vide)
        _ if app.chart_loading => render_message(frame, palette, chunks[1], "⟳ Loading..."),
        _ => render_message(frame, palette, chunks[1], ""),
    }
}

// ============================================================================
// Header
// ============================================================================

fn render_chart_header(frame: &mut Frame, app: &App, asset: &Asset, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.base())
        .title(format!(" 📈 {} ", asset.name));

    let mut spans = vec![Span::styled(
        format!("Last {} Days Trend", CHART_WINDOW_DAYS),
        Style::default().fg(palette.muted),
    )];

    if let Some(change) = app.chart.as_ref().and_then(|s| s.change_percent()) {
        let color = if change >= 0.0 { palette.positive } else { palette.negative };
        let arrow = if change >= 0.0 { "▲" } else { "▼" };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {:+.2}%", arrow, change),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let help = Line::from(vec![
        Span::styled("[↑↓]", palette.key()),
        Span::raw(" Asset  "),
        Span::styled("[ESC]", palette.key()),
        Span::raw(" Close"),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(spans), help])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Graphique
// ============================================================================

/// Dessine le graphique ligne
///
/// CONCEPT RUST : Iterator chaining
/// - .enumerate() donne l'abscisse (index de l'échantillon)
/// - .map() produit les points (x, y) attendus par Dataset
fn render_chart_graph(
    frame: &mut Frame,
    series: &ChartSeries,
    fiat: FiatCurrency,
    palette: &Palette,
    area: Rect,
) {
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect();

    let (min_price, max_price) = match series.price_bounds() {
        Some(bounds) => bounds,
        None => return,
    };

    // Marge de 5% pour que la courbe respire
    let margin = ((max_price - min_price) * 0.05).max(max_price.abs() * 0.001);
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;

    let color = match series.change_percent() {
        Some(change) if change < 0.0 => palette.negative,
        _ => palette.accent,
    };

    let datasets = vec![Dataset::default()
        .name("Price")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let first_label = series.first().map(|p| p.date_label()).unwrap_or_default();
    let last_label = series.last().map(|p| p.date_label()).unwrap_or_default();

    let x_axis = Axis::default()
        .style(Style::default().fg(palette.muted))
        .bounds([0.0, (points.len().max(2) - 1) as f64])
        .labels(vec![Span::raw(first_label), Span::raw(last_label)]);

    let y_axis = Axis::default()
        .title(format!("Price ({})", fiat.code()))
        .style(Style::default().fg(palette.muted))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{}{}", fiat.symbol(), format_price(y_min))),
            Span::raw(format!("{}{}", fiat.symbol(), format_price((y_min + y_max) / 2.0))),
            Span::raw(format!("{}{}", fiat.symbol(), format_price(y_max))),
        ]);

    let last_price = series.last().map(|p| p.price).unwrap_or(0.0);
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .style(palette.base())
                .title(format!(" {}{} ", fiat.symbol(), format_price(last_price))),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Zone du graphique sans données : message centré (éventuellement vide)
fn render_message(frame: &mut Frame, palette: &Palette, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .style(palette.base());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(palette.muted),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::{App, AppCommand, AppResult};
    use crate::models::{Asset, ChartPoint, ChartSeries, FiatCurrency};
    use crate::ui::render;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_chart_popup_loading_then_loaded() {
        let mut app = App::default();
        let token = match app.start() {
            AppCommand::FetchListing { token, .. } => token,
            other => panic!("unexpected {:?}", other),
        };
        app.apply_result(AppResult::ListingLoaded {
            token,
            assets: vec![Asset::new("ethereum", "Ethereum", "eth", 2500.0)],
        });

        let chart_token = match app.open_chart() {
            Some(AppCommand::FetchChart { token, .. }) => token,
            other => panic!("unexpected {:?}", other),
        };
        assert!(screen_text(&app).contains("Loading..."));

        let mut series = ChartSeries::new("ethereum".to_string(), FiatCurrency::Usd);
        for (i, price) in [2400.0, 2450.0, 2500.0].iter().enumerate() {
            let ts = chrono::DateTime::from_timestamp(1_700_000_000 + i as i64 * 86_400, 0).unwrap();
            series.push(ChartPoint::new(ts, *price));
        }
        app.apply_result(AppResult::ChartLoaded { token: chart_token, series });

        let text = screen_text(&app);
        assert!(text.contains("Last 7 Days Trend"));
        assert!(text.contains("+4.17%"));
        assert!(!text.contains("Loading..."));
    }
}
