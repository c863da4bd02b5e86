// ============================================================================
// Chart - Graphique de la série temporelle
// ============================================================================
// Trois vues de la même série selon l'onglet :
// - Dashboard : ventes réelles vs prévues + pics/creux annotés
// - Forecast : historique + projection renvoyée par l'API
// - Sentiment : score de sentiment quotidien (en %)
//
// CONCEPTS RATATUI :
// 1. Chart widget : plusieurs Dataset superposés
// 2. GraphType::Scatter : marqueurs isolés (annotations)
// 3. Un Dataset emprunte ses points : les Vec doivent vivre plus longtemps
//    que le Chart
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::analytics::{Annotation, AnnotationKind};
use crate::app::{App, Tab};
use crate::models::TimeSeries;

const ACTUAL_COLOR: Color = Color::Rgb(0x78, 0xc8, 0xff);
const FORECAST_COLOR: Color = Color::Rgb(0xb0, 0x84, 0xff);
const PROJECTION_COLOR: Color = Color::Rgb(0xff, 0x7a, 0xd9);
const PEAK_COLOR: Color = Color::Green;
const VALLEY_COLOR: Color = Color::Red;
const CURSOR_COLOR: Color = Color::Yellow;

/// Dessine le graphique de l'onglet courant (Dashboard, Forecast ou Sentiment)
pub fn render_series_chart(frame: &mut Frame, app: &App, area: Rect) {
    let series = &app.data.series;
    if series.is_empty() {
        render_no_data(frame, area, "Pas de données à afficher");
        return;
    }

    match app.current_tab {
        Tab::Sentiment => render_sentiment(frame, app, area),
        Tab::Forecast => render_forecast(frame, app, area),
        _ => render_sales(frame, app, area),
    }
}

// ============================================================================
// Dashboard : ventes + annotations
// ============================================================================

fn render_sales(frame: &mut Frame, app: &App, area: Rect) {
    let series = &app.data.series;
    let annotations = app.annotations();

    // Une ligne par bulle sous le graphique
    let callout_height = if annotations.is_empty() {
        0
    } else {
        annotations.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(callout_height)])
        .split(area)
        .to_vec();

    let actual = indexed(series.points.iter().map(|p| p.actual));
    let forecast = indexed(series.points.iter().map(|p| p.forecast));
    let peaks = annotation_points(series, &annotations, AnnotationKind::Peak);
    let valleys = annotation_points(series, &annotations, AnnotationKind::Valley);

    let (y_min, y_max) = padded_bounds(series.value_bounds().unwrap_or((0.0, 1.0)));
    let cursor = cursor_line(app.cursor, y_min, y_max);

    let mut datasets = vec![
        Dataset::default()
            .name("Actual")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ACTUAL_COLOR))
            .data(&actual),
        Dataset::default()
            .name("Forecast")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(FORECAST_COLOR))
            .data(&forecast),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(CURSOR_COLOR))
            .data(&cursor),
    ];
    if !peaks.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Peak")
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(PEAK_COLOR))
                .data(&peaks),
        );
    }
    if !valleys.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Dip")
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(VALLEY_COLOR))
                .data(&valleys),
        );
    }

    let title = match series.total_change_percent() {
        Some(change) => format!(" 📈 Sales vs Forecast ({:+.1}%) ", change),
        None => " 📈 Sales vs Forecast ".to_string(),
    };
    let chart = Chart::new(datasets)
        .block(chart_block(&title))
        .x_axis(date_axis(series, series.len()))
        .y_axis(money_axis(y_min, y_max));
    frame.render_widget(chart, chunks[0]);

    if !annotations.is_empty() {
        render_callouts(frame, series, &annotations, chunks[1]);
    }
}

/// Points (x, y) des annotations d'un type donné
fn annotation_points(series: &TimeSeries, annotations: &[Annotation], kind: AnnotationKind) -> Vec<(f64, f64)> {
    annotations
        .iter()
        .filter(|a| a.kind == kind)
        .filter_map(|a| series.get(a.source_index).map(|p| (a.source_index as f64, p.actual)))
        .collect()
}

/// Bulles "Sales Peak" / "Sales Dip"
fn render_callouts(frame: &mut Frame, series: &TimeSeries, annotations: &[Annotation], area: Rect) {
    let lines: Vec<Line> = annotations
        .iter()
        .filter_map(|annotation| {
            let point = series.get(annotation.source_index)?;
            let callout = annotation.callout(point);
            let (arrow, color) = if annotation.is_peak() {
                ("▲", PEAK_COLOR)
            } else {
                ("▼", VALLEY_COLOR)
            };
            Some(Line::from(vec![
                Span::styled(
                    format!("{} {} ", arrow, callout.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{} ", point.date), Style::default().fg(Color::Gray)),
                Span::styled(callout.value, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!(" ({})  ", callout.change), Style::default().fg(color)),
                Span::styled(callout.insight, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Annotations "),
    );
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Forecast : historique + projection
// ============================================================================

fn render_forecast(frame: &mut Frame, app: &App, area: Rect) {
    let series = &app.data.series;
    let projection = &app.data.projection;
    let offset = series.len();

    let actual = indexed(series.points.iter().map(|p| p.actual));
    let forecast = indexed(series.points.iter().map(|p| p.forecast));
    // La projection démarre juste après le dernier point connu
    let projected: Vec<(f64, f64)> = projection
        .iter()
        .enumerate()
        .map(|(i, &(_, value))| ((offset + i) as f64, value))
        .collect();

    let (min, max) = series.value_bounds().unwrap_or((0.0, 1.0));
    let (min, max) = projection
        .iter()
        .fold((min, max), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)));
    let (y_min, y_max) = padded_bounds((min, max));
    let cursor = cursor_line(app.cursor, y_min, y_max);

    let mut datasets = vec![
        Dataset::default()
            .name("Actual")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ACTUAL_COLOR))
            .data(&actual),
        Dataset::default()
            .name("Forecast")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(FORECAST_COLOR))
            .data(&forecast),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(CURSOR_COLOR))
            .data(&cursor),
    ];
    if !projected.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Projection")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(PROJECTION_COLOR))
                .data(&projected),
        );
    }

    let title = match projection.last() {
        Some((date, _)) => format!(" 🔮 Forecast until {} ", date),
        None => " 🔮 Forecast ".to_string(),
    };
    let chart = Chart::new(datasets)
        .block(chart_block(&title))
        .x_axis(date_axis(series, offset + projection.len()))
        .y_axis(money_axis(y_min, y_max));
    frame.render_widget(chart, area);
}

// ============================================================================
// Sentiment
// ============================================================================

fn render_sentiment(frame: &mut Frame, app: &App, area: Rect) {
    let series = &app.data.series;
    let sentiment = indexed(series.points.iter().map(|p| p.sentiment * 100.0));
    let cursor = cursor_line(app.cursor, 0.0, 100.0);

    let datasets = vec![
        Dataset::default()
            .name("Sentiment %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PROJECTION_COLOR))
            .data(&sentiment),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(CURSOR_COLOR))
            .data(&cursor),
    ];

    let mean = series
        .mean_sentiment()
        .map(|m| format!(" 💬 Sentiment (mean {:.0}%) ", m * 100.0))
        .unwrap_or_else(|| " 💬 Sentiment ".to_string());

    let chart = Chart::new(datasets)
        .block(chart_block(&mean))
        .x_axis(date_axis(series, series.len()))
        .y_axis(
            Axis::default()
                .title("%")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );
    frame.render_widget(chart, area);
}

// ============================================================================
// Helpers
// ============================================================================

/// Convertit une suite de valeurs en points (index, valeur)
///
/// CONCEPT RUST : impl Iterator en argument
/// - Accepte n'importe quel itérateur de f64 sans allocation intermédiaire
fn indexed(values: impl Iterator<Item = f64>) -> Vec<(f64, f64)> {
    values.enumerate().map(|(i, v)| (i as f64, v)).collect()
}

/// Ligne verticale sous le curseur
fn cursor_line(cursor: usize, y_min: f64, y_max: f64) -> Vec<(f64, f64)> {
    let x = cursor as f64;
    vec![(x, y_min), (x, y_max)]
}

/// Ajoute une marge de 5% pour que le graphique respire
fn padded_bounds((min, max): (f64, f64)) -> (f64, f64) {
    let margin = ((max - min) * 0.05).max(1.0);
    ((min - margin).max(0.0), max + margin)
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
}

/// Axe X : première date, date du milieu, dernière date de la série
fn date_axis(series: &TimeSeries, len: usize) -> Axis<'static> {
    let label = |index: usize| {
        series
            .get(index)
            .map(|p| p.date.format("%m-%d").to_string())
            .unwrap_or_default()
    };
    let last = series.len().saturating_sub(1);

    Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, len.saturating_sub(1).max(1) as f64])
        .labels(vec![
            Span::raw(label(0)),
            Span::raw(label(last / 2)),
            Span::raw(label(last)),
        ])
}

fn money_axis(y_min: f64, y_max: f64) -> Axis<'static> {
    Axis::default()
        .title("$")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.0}", y_min)),
            Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.0}", y_max)),
        ])
}

/// Affiche un message quand il n'y a pas de données à afficher
pub fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled("[r] Reload", Style::default().fg(Color::Yellow))),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
