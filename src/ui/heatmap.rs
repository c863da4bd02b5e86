// ============================================================================
// Heatmap - Matrice de corrélation
// ============================================================================
// CONCEPTS RATATUI :
// 1. Table : lignes (Row) de cellules (Cell) + largeurs de colonnes
// 2. Chaque Cell a son propre style (fond coloré selon |r|)
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::analytics::color::{HIGH, LOW};
use crate::analytics::CorrelationStrength;
use crate::app::App;
use crate::models::CorrelationMatrix;
use crate::ui::chart::render_no_data;

const CELL_WIDTH: u16 = 12;

/// Dessine la heatmap et la légende de la ligne sélectionnée
pub fn render_heatmap(frame: &mut Frame, app: &App, area: Rect) {
    let matrix = &app.data.correlation;
    if matrix.is_empty() {
        render_no_data(frame, area, "Pas de matrice de corrélation");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    render_table(frame, matrix, app.cursor, chunks[0]);
    render_legend(frame, matrix, app.cursor, chunks[1]);
}

fn render_table(frame: &mut Frame, matrix: &CorrelationMatrix, selected: usize, area: Rect) {
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(matrix.metrics.iter().map(|m| Cell::from(m.as_str())))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = matrix
        .metrics
        .iter()
        .enumerate()
        .map(|(i, metric)| {
            let label_style = if i == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Cyan)
            };

            let cells = (0..matrix.len()).map(|j| {
                let value = matrix.get(i, j).unwrap_or(0.0);
                Cell::from(format!("{:>6.2}", value)).style(
                    Style::default()
                        .bg(cell_color(value))
                        .fg(Color::Black),
                )
            });

            Row::new(std::iter::once(Cell::from(metric.as_str()).style(label_style)).chain(cells))
        })
        .collect();

    let widths: Vec<Constraint> = (0..=matrix.len()).map(|_| Constraint::Length(CELL_WIDTH)).collect();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" 🔗 Correlation "),
    );
    frame.render_widget(table, area);
}

/// Fond de cellule : LOW pour r = 0, HIGH pour |r| = 1
fn cell_color(value: f64) -> Color {
    let t = if value.is_finite() { value.abs().min(1.0) } else { 0.0 };
    LOW.lerp(HIGH, t).into()
}

fn render_legend(frame: &mut Frame, matrix: &CorrelationMatrix, selected: usize, area: Rect) {
    let mut line = match (matrix.metrics.get(selected), matrix.row_mean_off_diagonal(selected)) {
        (Some(metric), Some(mean)) => Line::from(vec![
            Span::styled(format!("{} ↔ others: ", metric), Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}", mean), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" ({})", CorrelationStrength::from_value(mean).label())),
        ]),
        _ => Line::from(Span::styled("←/→ select a metric", Style::default().fg(Color::Gray))),
    };

    if let Some(overall) = matrix.mean_off_diagonal() {
        line.spans.push(Span::styled(
            format!("  │  Overall: {:.2}", overall),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}
