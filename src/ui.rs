use crate::app::{App, Focus};
use crate::braille::BrailleCanvas;
use crate::chart::pie::rasterize_pie;
use crate::chart::{BarChartSpec, ChartSpec, PieChartSpec};
use crate::pages::{Page, PAGE_SELECTOR_LABEL, SIDEBAR_TITLE};
use crate::view::{Block as ViewBlock, Metric, View};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph, Widget, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 34;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into body and status bar
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    render_sidebar(frame, app, columns[0]);
    render_page(frame, app, app.view(), columns[1]);
    render_status_bar(frame, app, rows[1]);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Pages;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let title = Paragraph::new(SIDEBAR_TITLE)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    frame.render_widget(title, parts[0]);
    frame.render_widget(
        Paragraph::new(PAGE_SELECTOR_LABEL).style(Style::default().fg(Color::DarkGray)),
        parts[1],
    );

    let items: Vec<ListItem> = Page::ALL.iter().map(|p| ListItem::new(p.label())).collect();
    let list = List::new(items)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selection().page.index()));
    frame.render_stateful_widget(list, parts[2], &mut state);
}

/// Height each block asks for; chart rows share what is left
fn block_constraint(block: &ViewBlock) -> Constraint {
    match block {
        ViewBlock::Title(_) => Constraint::Length(2),
        ViewBlock::Text(_) | ViewBlock::Selector { .. } | ViewBlock::Separator => Constraint::Length(1),
        ViewBlock::Metrics(_) => Constraint::Length(3),
        ViewBlock::Charts(_) => Constraint::Min(8),
        ViewBlock::Error(_) => Constraint::Length(3),
    }
}

fn render_page(frame: &mut Frame, app: &App, view: &View, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.selection().page.label()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(view.blocks.iter().map(block_constraint))
        .split(inner);

    for (block, slot) in view.blocks.iter().zip(slots.iter()) {
        match block {
            ViewBlock::Title(text) => {
                let title = Paragraph::new(text.as_str())
                    .style(Style::default().add_modifier(Modifier::BOLD));
                frame.render_widget(title, *slot);
            }
            ViewBlock::Text(text) => {
                frame.render_widget(Paragraph::new(text.as_str()).wrap(Wrap { trim: true }), *slot);
            }
            ViewBlock::Selector {
                label,
                options,
                selected,
            } => render_selector(frame, app, label, options, *selected, *slot),
            ViewBlock::Metrics(metrics) => render_metrics(frame, metrics, *slot),
            ViewBlock::Separator => {
                let rule = "─".repeat(slot.width as usize);
                frame.render_widget(
                    Paragraph::new(rule).style(Style::default().fg(Color::DarkGray)),
                    *slot,
                );
            }
            ViewBlock::Charts(charts) => render_charts(frame, charts, *slot),
            ViewBlock::Error(message) => {
                let error = Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Color::Red))
                            .title(" Error "),
                    );
                frame.render_widget(error, *slot);
            }
        }
    }
}

fn render_selector(
    frame: &mut Frame,
    app: &App,
    label: &str,
    options: &[String],
    selected: usize,
    area: Rect,
) {
    let active = if app.focus == Focus::Analysis {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED)
    };

    let mut spans = vec![Span::styled(format!("{label} "), Style::default().fg(Color::DarkGray))];
    for (idx, option) in options.iter().enumerate() {
        let style = if idx == selected { active } else { Style::default().fg(Color::Gray) };
        spans.push(Span::styled(format!(" {option} "), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_metrics(frame: &mut Frame, metrics: &[Metric], area: Rect) {
    if metrics.is_empty() {
        return;
    }
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(metrics.iter().map(|_| Constraint::Ratio(1, metrics.len() as u32)))
        .split(area);

    for (metric, cell) in metrics.iter().zip(cells.iter()) {
        let text = vec![
            Line::from(Span::styled(metric.label.as_str(), Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                metric.formatted(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(Paragraph::new(text), *cell);
    }
}

fn render_charts(frame: &mut Frame, charts: &[ChartSpec], area: Rect) {
    if charts.is_empty() {
        return;
    }
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(charts.iter().map(|_| Constraint::Ratio(1, charts.len() as u32)))
        .split(area);

    for (chart, cell) in charts.iter().zip(cells.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", chart.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        match chart {
            ChartSpec::Bar(bar) => render_bar_chart(frame, bar, block, *cell),
            ChartSpec::Pie(pie) => render_pie_chart(frame, pie, block, *cell),
        }
    }
}

fn render_bar_chart(frame: &mut Frame, spec: &BarChartSpec, block: Block, area: Rect) {
    let block = block.title_bottom(Line::from(Span::styled(
        format!(" {} / {} ", spec.axis_labels.x, spec.axis_labels.y),
        Style::default().fg(Color::DarkGray),
    )));
    let inner_width = block.inner(area).width as usize;

    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .map(|datum| {
            Bar::default()
                .value(datum.value)
                .label(Line::from(datum.label.as_str()))
                .text_value(spec.tick_format.format(datum.value))
                .style(Style::default().fg(datum.color.into()))
                .value_style(Style::default().fg(Color::Black).bg(datum.color.into()))
        })
        .collect();

    // Wide enough for the formatted value, but never wider than the area allows
    let gap = 2;
    let fit = inner_width.saturating_sub(gap * bars.len()) / bars.len().max(1);
    let widest = spec
        .bars
        .iter()
        .map(|b| spec.tick_format.format(b.value).len())
        .max()
        .unwrap_or(1);
    let bar_width = widest.max(3).min(fit.max(1)) as u16;

    let mut chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(gap as u16)
        .max(spec.max_value().max(1));
    // Transparent plot: only paint a background when one is requested
    if let Some(bg) = spec.plot_background {
        chart = chart.style(Style::default().bg(bg.into()));
    }
    frame.render_widget(chart, area);
}

fn render_pie_chart(frame: &mut Frame, spec: &PieChartSpec, block: Block, area: Rect) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(spec.slices.len() as u16),
        ])
        .split(inner);

    let layers = rasterize_pie(spec, parts[0].width as usize, parts[0].height as usize);
    let colors = spec.slices.iter().map(|s| Color::from(s.color)).collect();
    frame.render_widget(PieWidget { layers, colors }, parts[0]);

    let legend: Vec<Line> = spec
        .slices
        .iter()
        .zip(spec.annotations())
        .map(|(slice, note)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice.color.into())),
                Span::raw(note),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), parts[1]);
}

/// Braille pie, one colored layer per slice
struct PieWidget {
    layers: Vec<BrailleCanvas>,
    colors: Vec<Color>,
}

impl PieWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                // Blank cells leave earlier layers visible
                if let Some(ch) = canvas.glyph(col as usize, row as usize) {
                    buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for PieWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Later slices paint over earlier ones where cells are shared
        for (layer, color) in self.layers.iter().zip(&self.colors) {
            Self::render_layer(layer, *color, area, buf);
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Page: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.selection().page.label(), Style::default().fg(Color::Yellow)),
    ];
    if app.has_analysis_selector() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            app.selection().analysis.label(),
            Style::default().fg(Color::Magenta),
        ));
    }
    spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
        app.data().path().display().to_string(),
        Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
        " | jk:page tab:focus hl:analysis q:quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
