// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, Tabs, etc.)
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Tab};
use crate::ui::{chart, heatmap, insights, scatter};

/// Dessine l'interface complète
///
/// CONCEPT RUST : &mut Frame + &App
/// - On dessine dans Frame (mutable), on lit l'état sans le modifier
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
///
/// CONCEPT RUST : Rc<[T]> vs Vec<T>
/// - Layout::split() retourne Rc<[Rect]>
/// - On le convertit en Vec avec .to_vec() pour simplifier
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : onglets + statut
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : raccourcis / messages
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : onglets, source, crédits
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(area);

    // CONCEPT RATATUI : Tabs widget
    // - Un titre par onglet, select() met en évidence l'onglet actif
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::Yellow)),
                Span::raw(tab.title()),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Lumenboard "),
        )
        .select(app.current_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
    frame.render_widget(tabs, chunks[0]);

    frame.render_widget(status_paragraph(app), chunks[1]);
}

/// "● LIVE  mock  🪙 750 / 1000"
fn status_paragraph(app: &App) -> Paragraph<'static> {
    let mut spans = Vec::new();

    if app.live_mode {
        spans.push(Span::styled(
            "● LIVE  ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(
        app.data_source.label(),
        Style::default().fg(Color::Gray),
    ));

    if let Some(status) = &app.token_status {
        let color = if status.is_exhausted() {
            Color::Red
        } else if status.ratio() < 0.2 {
            Color::Yellow
        } else {
            Color::Green
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("🪙 {}", status.badge()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
}

// ============================================================================
// Main Content : graphique de l'onglet + panneau d'insights
// ============================================================================

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.data.is_empty() {
        if app.is_loading_data() {
            render_loading(frame, app, area);
        } else {
            chart::render_no_data(frame, area, "Pas de données chargées");
        }
        return;
    }

    let (chart_area, insights_area) = if app.show_insights {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    // CONCEPT RUST : Match sur enum pour router
    // - Le compilateur force à gérer tous les onglets
    match app.current_tab {
        Tab::Dashboard | Tab::Forecast | Tab::Sentiment => {
            chart::render_series_chart(frame, app, chart_area)
        }
        Tab::Visual => scatter::render_scatter(frame, app, chart_area),
        Tab::Correlation => heatmap::render_heatmap(frame, app, chart_area),
    }

    if let Some(area) = insights_area {
        insights::render_insights(frame, app, area);
    }
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let message = app
        .loading_message
        .clone()
        .unwrap_or_else(|| "Chargement...".to_string());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("⏳ {}", message),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : raccourcis, confirmation, chargement, erreur
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_quit_confirmation() {
        // CONCEPT : Style avec BLINK pour attirer l'attention
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_loading_data() {
        Line::from(Span::styled(
            format!(
                "⏳ {}",
                app.loading_message.as_deref().unwrap_or("Chargement...")
            ),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &app.last_error {
        Line::from(vec![
            Span::styled(
                format!("✖ {}  ", error),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Dismiss"),
        ])
    } else {
        shortcuts_line(app)
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn shortcuts_line(app: &App) -> Line<'static> {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let live = if app.live_mode { " Pause  " } else { " Live  " };

    Line::from(vec![
        Span::styled("[q]", key),
        Span::raw(" Quit  "),
        Span::styled("[Tab / 1-5]", key),
        Span::raw(" Views  "),
        Span::styled("[← →]", key),
        Span::raw(" Hover  "),
        Span::styled("[a]", key),
        Span::raw(" Annotations  "),
        Span::styled("[i]", key),
        Span::raw(" Insights  "),
        Span::styled("[Space]", key),
        Span::raw(live),
        Span::styled("[r]", key),
        Span::raw(" Reload"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::mock_dashboard;
    use crate::api::{ApiError, TokenStatus};
    use crate::config::Config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn demo_app() -> App {
        let data = mock_dashboard(&mut StdRng::seed_from_u64(3));
        App::with_data(&Config::default(), data)
    }

    /// Rend l'écran et retourne son contenu sous forme de texte
    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 45)).unwrap();
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
    fn test_every_tab_renders() {
        let mut app = demo_app();
        for (tab, title) in Tab::ALL.iter().zip([
            "Sales vs Forecast",
            "Forecast",
            "Sentiment",
            "Sentiment × Brightness",
            "Correlation",
        ]) {
            app.select_tab(*tab);
            let screen = draw(&app);
            assert!(screen.contains(title), "missing {:?} on {:?}", title, tab);
            assert!(screen.contains("Lumenboard"));
        }
    }

    #[test]
    fn test_footer_states() {
        let mut app = demo_app();
        assert!(draw(&app).contains("Annotations"));

        app.report_error("boom".to_string(), Some(&ApiError::RateLimited { retry_after: 30 }));
        assert!(draw(&app).contains("Rate limited, retry in 30s"));

        app.request_quit();
        assert!(draw(&app).contains("à nouveau pour quitter"));
    }

    #[test]
    fn test_token_badge_and_hidden_insights() {
        let mut app = demo_app();
        app.set_token_status(TokenStatus {
            total_tokens: 1000,
            used_tokens: 250,
            remaining_tokens: 750,
            ..TokenStatus::default()
        });
        assert!(draw(&app).contains("750 / 1000"));

        app.toggle_insights();
        assert!(!draw(&app).contains("History"));
    }

    #[test]
    fn test_empty_and_loading() {
        let mut app = App::new();
        assert!(draw(&app).contains("Pas de données chargées"));

        app.start_loading(Some("Loading dashboard".to_string()));
        assert!(draw(&app).contains("Loading dashboard"));
    }
}

// ============================================================================
// Notes pédagogiques
// ============================================================================
//
// CONCEPTS RATATUI APPRIS :
//
// 1. Frame et rendering
//    - render_widget() : dessine un widget dans une zone
//
// 2. Layout imbriqués
//    - Vertical (header / content / footer), puis Horizontal
//      (graphique / panneau d'insights)
//
// 3. Widgets
//    - Tabs : navigation entre vues
//    - Chart, Table, List, Paragraph : un par type de contenu
//
// 4. TestBackend
//    - Rend l'interface en mémoire : les tests lisent le Buffer
//
// ============================================================================
