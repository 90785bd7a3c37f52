use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::color::Rgb;
use crate::map::controls::{LegendRow, SWATCH_OPACITY};
use crate::map::{Legend, Popup, ScaleBar, Viewport};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

/// Background of the legend and popup boxes
const PANEL: Rgb = Rgb::WHITE;

/// Scale bar width limit in character cells
const SCALE_MAX_CELLS: u16 = 24;

/// Black or white, whichever reads better on `bg`
fn ink_on(bg: Rgb) -> Color {
    if bg.luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " U.S. Airports & Traffic Control Towers ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let canvas = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &viewport, &app.caps);
    frame.render_widget(
        MapWidget {
            canvas: &canvas,
            braille: app.caps.braille,
        },
        inner,
    );

    let paper = app.map_renderer.base().background;
    render_scale_bar(frame, &viewport, inner, paper, app.caps.unicode);
    render_attribution(frame, &app.map_renderer.attribution(), inner, paper);
    render_legend(frame, &app.legend, inner, app.caps.marker_glyph());
    if let Some(popup) = &app.popup {
        render_popup(frame, popup, &viewport, inner);
    }
}

/// Draws the composited canvas cell by cell
struct MapWidget<'a> {
    canvas: &'a BrailleCanvas,
    braille: bool,
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row_idx, row) in self.canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, cell) in row.iter().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                let ch = match cell.glyph {
                    Some(glyph) => glyph,
                    None if cell.dots == 0 => ' ',
                    None if self.braille => cell.braille(),
                    // One ASCII mark stands in for the whole dot pattern
                    None => '.',
                };
                let target = &mut buf[(area.x + col_idx as u16, y)];
                target.set_char(ch);
                if let Some(fg) = cell.fg {
                    target.set_fg(fg.into());
                }
                if let Some(bg) = cell.bg {
                    target.set_bg(bg.into());
                }
            }
        }
    }
}

fn render_legend(frame: &mut Frame, legend: &Legend, inner: Rect, marker: char) {
    let text_style = Style::default().fg(ink_on(PANEL)).bg(PANEL.into());
    let width = (legend.label_width() as u16 + 4).min(inner.width);
    let height = (legend.rows().len() as u16 + 2).min(inner.height);
    let area = Rect::new(inner.right().saturating_sub(width), inner.y, width, height);

    let lines: Vec<Line> = legend
        .rows()
        .iter()
        .map(|row| match row {
            LegendRow::Heading(text) => Line::from(Span::styled(*text, text_style.add_modifier(Modifier::BOLD))),
            LegendRow::Swatch { color, label } => Line::from(vec![
                Span::styled("██", Style::default().fg(color.blend(PANEL, SWATCH_OPACITY).into())),
                Span::styled(" ", text_style),
                Span::styled(label.as_str(), text_style),
            ]),
            LegendRow::Marker { color, label } => Line::from(vec![
                Span::styled(marker.to_string(), Style::default().fg((*color).into())),
                Span::styled(" ", text_style),
                Span::styled(*label, text_style),
            ]),
            LegendRow::Separator => Line::from(""),
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray).bg(PANEL.into()));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).style(text_style).block(block), area);
}

fn render_scale_bar(frame: &mut Frame, viewport: &Viewport, inner: Rect, paper: Rgb, unicode: bool) {
    if inner.height < 3 {
        return;
    }
    let max_cells = SCALE_MAX_CELLS.min(inner.width / 3);
    let Some(bar) = ScaleBar::measure(viewport, max_cells as usize * 2) else {
        return;
    };
    let (rule, tick) = if unicode { ('─', '┤') } else { ('-', '|') };
    let style = Style::default().fg(ink_on(paper));

    for (offset, line) in [bar.metric, bar.imperial].into_iter().enumerate() {
        let cells = (line.width / 2).max(1);
        let text = format!("{}{} {}", rule.to_string().repeat(cells), tick, line.label);
        let y = inner.bottom() - 3 + offset as u16;
        let area = Rect::new(inner.x, y, inner.width, 1);
        frame.render_widget(Paragraph::new(Span::styled(text, style)), area);
    }
}

fn render_attribution(frame: &mut Frame, attribution: &str, inner: Rect, paper: Rgb) {
    let width = inner.width as usize;
    let text: String = if attribution.chars().count() > width {
        attribution.chars().take(width).collect()
    } else {
        attribution.to_string()
    };
    let area = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(ink_on(paper)).add_modifier(Modifier::DIM)))
            .alignment(Alignment::Right),
        area,
    );
}

/// Box placed above its anchor when it fits, otherwise below it
fn popup_area(anchor: (i32, i32), width: u16, height: u16, inner: Rect) -> Rect {
    let width = width.min(inner.width);
    let height = height.min(inner.height);
    let (cx, cy) = (anchor.0.div_euclid(2), anchor.1.div_euclid(4));

    let max_x = i32::from(inner.width - width);
    let x = (cx - i32::from(width) / 2).clamp(0, max_x);
    let max_y = i32::from(inner.height - height);
    let y = if cy >= i32::from(height) { cy - i32::from(height) } else { cy + 1 };

    Rect::new(
        inner.x + x as u16,
        inner.y + y.clamp(0, max_y) as u16,
        width,
        height,
    )
}

fn render_popup(frame: &mut Frame, popup: &Popup, viewport: &Viewport, inner: Rect) {
    let text_style = Style::default().fg(ink_on(PANEL)).bg(PANEL.into());
    let mut lines = Vec::with_capacity(popup.sections.len() * 2);
    for section in &popup.sections {
        lines.push(Line::from(Span::styled(section.heading, text_style.add_modifier(Modifier::BOLD))));
        lines.push(Line::from(Span::styled(section.body.as_str(), text_style)));
    }
    let text_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;

    let anchor = viewport.project(popup.anchor.x, popup.anchor.y);
    let area = popup_area(anchor, text_width + 4, lines.len() as u16 + 2, inner);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray).bg(PANEL.into()))
        .title_bottom(Line::from(" esc ").right_aligned());
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).style(text_style).block(block), area);
}

fn toggle_span(on: bool, on_label: &'static str, off_label: &'static str) -> Span<'static> {
    Span::styled(
        if on { on_label } else { off_label },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" ", Style::default()),
        toggle_span(settings.show_base, "[B]ase ", "[b]ase "),
        toggle_span(settings.show_states, "[S]tates ", "[s]tates "),
        toggle_span(settings.show_airports, "[A]irports ", "[a]irports "),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.hovered_name().unwrap_or("-").to_string(),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.layer_status(), Style::default().fg(Color::DarkGray)),
        Span::styled(
            " | hjkl:pan +/-:zoom click:info r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ink_on() {
        assert_eq!(ink_on(Rgb::WHITE), Color::Black);
        assert_eq!(ink_on(Rgb::DARK_RED), Color::White);
    }

    #[test]
    fn test_popup_above_anchor() {
        let inner = Rect::new(1, 1, 60, 30);
        // Anchor dot (40, 80) is cell (20, 20)
        let area = popup_area((40, 80), 20, 6, inner);
        assert_eq!(area, Rect::new(11, 15, 20, 6));
    }

    #[test]
    fn test_popup_flips_below_near_top() {
        let inner = Rect::new(1, 1, 60, 30);
        let area = popup_area((40, 8), 20, 6, inner);
        assert_eq!(area.y, 1 + 3);
    }

    #[test]
    fn test_popup_clamped_to_map() {
        let inner = Rect::new(1, 1, 60, 30);
        let area = popup_area((-50, 200), 20, 6, inner);
        assert_eq!(area.x, 1);
        let area = popup_area((500, 200), 20, 6, inner);
        assert_eq!(area.right(), inner.right());
    }
}
