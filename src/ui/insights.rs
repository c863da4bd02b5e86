// ============================================================================
// Panneau d'insights
// ============================================================================
// De haut en bas :
// - narration du graphique courant (titre + paragraphe)
// - phrase contextuelle du point survolé
// - historique des derniers insights (le plus récent en premier)
// - facteurs explicatifs renvoyés par l'API, quand il y en a
// - conclusions et recommandations de l'analyse du CSV envoyé
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::{AnalysisReport, FeatureImportance};

/// Dessine le panneau latéral
pub fn render_insights(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(area);

    render_narration(frame, app, chunks[0]);
    render_current(frame, app, chunks[1]);
    render_history(frame, app, chunks[2]);
}

fn render_narration(frame: &mut Frame, app: &App, area: Rect) {
    let narration = app.narration();

    let mut lines = vec![Line::from(narration.content)];
    if let Some(summary) = &app.data.summary {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            summary.clone(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
    }
    if let Some(summary) = app.data.report.as_ref().and_then(|r| r.summary.as_ref()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            summary.clone(),
            Style::default().fg(Color::White),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", narration.title)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_current(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.hovered.is_some() {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let paragraph = Paragraph::new(Span::styled(app.insight_text(), style))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" 💡 Insight "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Historique puis facteurs explicatifs dans une même liste
fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let mut items: Vec<ListItem> = app
        .insight_history
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", entry.time), Style::default().fg(Color::DarkGray)),
                Span::raw(entry.text.clone()),
            ]))
        })
        .collect();

    if !app.data.explanations.is_empty() {
        items.push(ListItem::new(Line::from("")));
        items.push(ListItem::new(Line::from(Span::styled(
            "Key factors",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))));
        items.extend(app.data.explanations.iter().map(factor_item));
    }

    if let Some(report) = app.data.report.as_ref().filter(|r| !r.is_empty()) {
        items.extend(report_items(report));
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" History ({}) ", app.insight_history.len())),
    );
    frame.render_widget(list, area);
}

/// "▲ price       ████████ 42%"
fn factor_item(factor: &FeatureImportance) -> ListItem<'static> {
    let (arrow, color) = if factor.is_positive() {
        ("▲", Color::Green)
    } else {
        ("▼", Color::Red)
    };
    let share = factor.importance.clamp(0.0, 1.0);
    let bar = "█".repeat((share * 10.0).round() as usize);

    ListItem::new(Line::from(vec![
        Span::styled(format!("{} ", arrow), Style::default().fg(color)),
        Span::raw(format!("{:<12} ", factor.feature)),
        Span::styled(format!("{:<10} ", bar), Style::default().fg(color)),
        Span::raw(format!("{:.0}%", share * 100.0)),
    ]))
}

/// Facteurs puis recommandations de l'analyse, une puce par entrée
fn report_items(report: &AnalysisReport) -> Vec<ListItem<'static>> {
    let sections = [
        ("Analysis factors", &report.key_factors, Color::Magenta),
        ("Recommendations", &report.recommendations, Color::Green),
    ];

    let mut items = Vec::new();
    for (title, entries, color) in sections {
        if entries.is_empty() {
            continue;
        }
        items.push(ListItem::new(Line::from("")));
        items.push(ListItem::new(Line::from(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))));
        items.extend(entries.iter().map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled("• ", Style::default().fg(color)),
                Span::raw(entry.clone()),
            ]))
        }));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::DashboardData;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 40)).unwrap();
        terminal
            .draw(|frame| render_insights(frame, app, frame.size()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_panel_shows_analysis_report() {
        let mut app = App::with_data(&Config::default(), DashboardData::default());
        assert!(!draw(&app).contains("Recommendations"));

        app.set_report(AnalysisReport {
            summary: Some("Growth is seasonal".to_string()),
            key_factors: vec!["Marketing Spend".to_string()],
            recommendations: vec!["Focus on retention".to_string()],
        });

        let screen = draw(&app);
        assert!(screen.contains("Growth is seasonal"));
        assert!(screen.contains("Analysis factors"));
        assert!(screen.contains("• Marketing Spend"));
        assert!(screen.contains("Recommendations"));
        assert!(screen.contains("• Focus on retention"));
    }

    #[test]
    fn test_empty_report_adds_nothing() {
        let mut app = App::with_data(&Config::default(), DashboardData::default());
        app.set_report(AnalysisReport::default());
        assert!(!draw(&app).contains("Recommendations"));
        assert!(!draw(&app).contains("Analysis factors"));
    }
}
