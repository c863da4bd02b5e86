// ============================================================================
// Scatter - Nuage sentiment × luminosité
// ============================================================================
// Chaque point est coloré selon sa variance de prévision, sa taille
// (Block ou Dot) reflète ses ventes. La droite de régression est tracée
// par-dessus, bornée à la zone visible.
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use crate::analytics::{format_thousands, scatter_summary, tooltip_descriptor, variance_color};
use crate::app::App;
use crate::ui::chart::render_no_data;

const X_BOUNDS: (f64, f64) = (0.0, 1.0);
const Y_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Dessine le nuage de points et son panneau de détail
pub fn render_scatter(frame: &mut Frame, app: &App, area: Rect) {
    let set = &app.data.scatter;
    if set.is_empty() {
        render_no_data(frame, area, "Pas de points à afficher");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(40)])
        .split(area);

    render_plot(frame, app, chunks[0]);
    render_details(frame, app, chunks[1]);
}

fn render_plot(frame: &mut Frame, app: &App, area: Rect) {
    let set = &app.data.scatter;
    let pairs = set.sentiment_brightness_pairs();
    let sales_domain = set.sales_domain();
    let regression = app
        .regression()
        .map(|line| line.display_segment(X_BOUNDS, Y_BOUNDS).to_vec())
        .unwrap_or_default();

    // CONCEPT RUST : Slices
    // - Un Dataset par point (couleur propre) : chacun emprunte `&pairs[i..i + 1]`
    //   sans recopier les données
    let mut datasets: Vec<Dataset> = set
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            Dataset::default()
                .marker(point_marker(sales_domain, point.sales))
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(variance_color(point.variance).into()))
                .data(&pairs[i..i + 1])
        })
        .collect();

    if !regression.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Trend")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::White))
                .data(&regression),
        );
    }

    // Le point sélectionné est dessiné en dernier pour rester visible
    if let Some(selected) = pairs.get(app.cursor..app.cursor + 1) {
        datasets.push(
            Dataset::default()
                .name("Selected")
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Yellow))
                .data(selected),
        );
    }

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" 🎨 Sentiment × Brightness "),
        )
        .x_axis(
            Axis::default()
                .title("Sentiment")
                .style(Style::default().fg(Color::Gray))
                .bounds([X_BOUNDS.0, X_BOUNDS.1])
                .labels(vec![Span::raw("0"), Span::raw("0.5"), Span::raw("1")]),
        )
        .y_axis(
            Axis::default()
                .title("Brightness")
                .style(Style::default().fg(Color::Gray))
                .bounds([Y_BOUNDS.0, Y_BOUNDS.1])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );
    frame.render_widget(chart, area);
}

/// Gros marqueur pour la moitié haute des ventes
///
/// `sales_domain` vient de `ScatterSet::sales_domain`, calculé une fois par rendu
fn point_marker(sales_domain: (f64, f64), sales: f64) -> symbols::Marker {
    let (min, max) = sales_domain;
    let normalized = if max > min { (sales - min) / (max - min) } else { 1.0 };
    if normalized >= 0.5 {
        symbols::Marker::Block
    } else {
        symbols::Marker::Dot
    }
}

/// Détail du point sélectionné + résumé du nuage
fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if let Some(point) = app.data.scatter.points.get(app.cursor) {
        let label = Style::default().fg(Color::Gray);
        lines.push(Line::from(vec![
            Span::styled("Sentiment:  ", label),
            Span::raw(format!("{:.0}%", point.sentiment * 100.0)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Brightness: ", label),
            Span::raw(format!("{:.0}%", point.brightness)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Sales:      ", label),
            Span::raw(format!("${}", format_thousands(point.sales))),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Variance:   ", label),
            Span::styled(
                format!("{:+.1}%", point.variance * 100.0),
                Style::default().fg(variance_color(point.variance).into()),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            tooltip_descriptor(point),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Summary",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(scatter_summary(&app.data.scatter)));

    if let Some(line) = app.regression() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Trend: y = {:.1}x + {:.1}", line.slope, line.intercept),
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" Point {}/{} ", app.cursor + 1, app.data.scatter.len())),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScatterPoint, ScatterSet};

    #[test]
    fn test_point_marker_by_sales() {
        let set = ScatterSet::new(vec![
            ScatterPoint::new(0.5, 50.0, 1000.0, 0.0),
            ScatterPoint::new(0.5, 50.0, 3000.0, 0.0),
        ]);
        let domain = set.sales_domain();
        assert_eq!(point_marker(domain, 1000.0), symbols::Marker::Dot);
        assert_eq!(point_marker(domain, 2000.0), symbols::Marker::Block);
        assert_eq!(point_marker(domain, 3000.0), symbols::Marker::Block);
        assert_eq!(point_marker((500.0, 500.0), 500.0), symbols::Marker::Block);
    }
}
