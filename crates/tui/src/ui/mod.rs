use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use textwrap::wrap;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use atlas_core::country::BorderLink;

use crate::app::{App, Focus, RegionPickerState, View, CARD_LINES};
use crate::strings::{
    build_status_line, countries_title, format_population, help_lines_ascii, BACK_HINT,
    ERROR_NOT_FOUND, ERROR_STATUS, INPUT_HINT, LABEL_BORDERS, LOADING, NO_BORDERS, REGION_ALL,
    TITLE_COUNTRY, TITLE_HELP, TITLE_REGION, TITLE_REGION_PICKER, TITLE_SEARCH, TITLE_THEME,
};
use crate::theme::Theme;

pub fn draw(f: &mut Frame, app: &mut App) {
    let th = app.theme.theme();
    // Paint the whole frame in the active palette first; the light/dark
    // toggle is a background swap, not a per-widget concern.
    f.render_widget(
        Block::default().style(Style::default().bg(th.bg).fg(th.text)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, th);
    app.main_area = Some(chunks[1]);
    if app.loading {
        draw_loading(f, chunks[1], th);
    } else {
        match app.view {
            View::Cards => draw_cards(f, chunks[1], app, th),
            View::Detail => draw_detail(f, chunks[1], app, th),
            View::Error => draw_error(f, chunks[1], app, th),
        }
    }
    draw_status(f, chunks[2], app, th);

    if let Some(state) = &app.region_picker {
        draw_region_picker(f, f.area(), state, th);
    }
    if app.show_help {
        draw_help(f, f.area(), th);
    }
}

fn title_span(text: &'static str, th: &Theme) -> Span<'static> {
    Span::styled(
        text,
        Style::default().fg(th.title).add_modifier(Modifier::BOLD),
    )
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),
            Constraint::Length(20),
            Constraint::Length(18),
        ])
        .split(area);

    draw_search_box(f, chunks[0], app, th);

    let region = app.region.as_deref().unwrap_or(REGION_ALL);
    let para = Paragraph::new(Line::from(vec![
        Span::raw(region.to_string()),
        Span::styled(" (F4)", Style::default().fg(th.text_dim)),
    ]))
    .block(
        Block::default()
            .title(title_span(TITLE_REGION, th))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(th.border_inactive)),
    );
    f.render_widget(para, chunks[1]);

    let para = Paragraph::new(Line::from(vec![
        Span::raw(app.theme.toggle_label()),
        Span::styled(" (F2)", Style::default().fg(th.text_dim)),
    ]))
    .block(
        Block::default()
            .title(title_span(TITLE_THEME, th))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(th.border_inactive)),
    );
    f.render_widget(para, chunks[2]);
}

fn draw_search_box(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let focused = matches!(app.focus, Focus::Input);
    let border_style = if focused {
        Style::default().fg(th.border_focus)
    } else {
        Style::default().fg(th.border_inactive)
    };
    let block = Block::default()
        .title(title_span(TITLE_SEARCH, th))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner_w = area.width.saturating_sub(2);

    let graphemes: Vec<&str> = app.input.graphemes(true).collect();
    let upto = app.input_cursor.min(graphemes.len());
    let cursor_w = UnicodeWidthStr::width(graphemes[..upto].concat().as_str()) as u16;
    // Keep the cursor inside the box when the query outgrows it.
    let scroll_x = cursor_w.saturating_sub(inner_w.saturating_sub(1));

    let para = if app.input.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            INPUT_HINT,
            Style::default().fg(th.text_dim),
        )))
        .block(block)
    } else {
        Paragraph::new(app.input.clone())
            .block(block)
            .scroll((0, scroll_x))
    };
    f.render_widget(para, area);

    if focused {
        let cursor_x = area.x + 1 + cursor_w.saturating_sub(scroll_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_loading(f: &mut Frame, area: Rect, th: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.panel_border));
    let pad = (area.height.saturating_sub(2) / 2) as usize;
    let mut lines = vec![Line::default(); pad];
    lines.push(
        Line::from(Span::styled(
            LOADING,
            Style::default().fg(th.text_dim).add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_cards(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let focused = matches!(app.focus, Focus::Main);
    let block = Block::default()
        .title(Span::styled(
            countries_title(app.result_count),
            Style::default().fg(th.title).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(th.border_focus)
        } else {
            Style::default().fg(th.panel_border)
        });

    let inner_h = area.height.saturating_sub(2) as usize;
    let take = (inner_h / CARD_LINES).max(1);
    let start = app.cards_scroll;
    let dim = Style::default().fg(th.text_dim);

    let mut lines: Vec<Line> = Vec::new();
    for (i, c) in app.cards.iter().enumerate().skip(start).take(take) {
        let selected = i == app.selected_card;
        let marker = if selected { "> " } else { "  " };
        let name_style = if selected && focused {
            Style::default()
                .fg(th.selected_fg)
                .bg(th.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default()
                .fg(th.border_focus)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(th.title).add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, c.name.official),
            name_style,
        )));
        lines.push(Line::from(vec![
            Span::styled("    Population: ", dim),
            Span::raw(format_population(c.population)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("    Region: ", dim),
            Span::raw(c.region.clone()),
            Span::styled("    Capital: ", dim),
            Span::raw(c.capital_label()),
        ]));
        lines.push(Line::default());
    }
    f.render_widget(Paragraph::new(lines).block(block), area);

    let inner = Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if app.cards.len() > take {
        let mut sb_state = ScrollbarState::new(app.cards.len()).position(app.cards_scroll);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_detail(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let Some(entry) = app.nav.peek() else {
        f.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(th.panel_border)),
            area,
        );
        return;
    };
    let c = &entry.country;
    let block = Block::default()
        .title(title_span(TITLE_COUNTRY, th))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.border_focus));
    let inner_w = area.width.saturating_sub(2) as usize;
    let dim = Style::default().fg(th.text_dim);
    let label = |s: &'static str| Span::styled(s, Style::default().add_modifier(Modifier::BOLD));

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(BACK_HINT, dim)));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        c.name.common.clone(),
        Style::default().fg(th.title).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        label("Native Name: "),
        Span::raw(c.native_name().to_string()),
    ]));
    lines.push(Line::from(vec![
        label("Population: "),
        Span::raw(format_population(c.population)),
    ]));
    lines.push(Line::from(vec![
        label("Region: "),
        Span::raw(c.region.clone()),
    ]));
    lines.push(Line::from(vec![
        label("Sub Region: "),
        Span::raw(c.subregion.clone().unwrap_or_else(|| "-".to_string())),
    ]));
    lines.push(Line::from(vec![
        label("Capital: "),
        Span::raw(c.capital_label()),
    ]));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        label("Top Level Domain: "),
        Span::raw(c.top_level_domain().to_string()),
    ]));
    lines.push(Line::from(vec![
        label("Currencies: "),
        Span::raw(c.currency_names()),
    ]));
    lines.push(Line::from(vec![
        label("Languages: "),
        Span::raw(c.language_names()),
    ]));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        label("Flag: "),
        Span::styled(c.flags.svg.clone(), dim),
    ]));
    if let Some(alt) = &c.flags.alt {
        for piece in wrap(alt, inner_w.max(20)) {
            lines.push(Line::from(Span::styled(piece.into_owned(), dim)));
        }
    }
    lines.push(Line::default());
    if entry.borders.is_empty() {
        lines.push(Line::from(vec![
            label(LABEL_BORDERS),
            Span::raw(" "),
            Span::styled(NO_BORDERS, dim),
        ]));
    } else {
        lines.push(Line::from(label(LABEL_BORDERS)));
        lines.extend(border_lines(
            &entry.borders,
            app.selected_border,
            inner_w,
            th,
            matches!(app.focus, Focus::Main),
        ));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// Border "buttons" laid out as rows of [ Name ] chips, wrapped to the
// panel width, with the selected one highlighted.
fn border_lines(
    borders: &[BorderLink],
    selected: usize,
    width: usize,
    th: &Theme,
    focused: bool,
) -> Vec<Line<'static>> {
    let mut out: Vec<Line> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0usize;
    for (i, b) in borders.iter().enumerate() {
        let text = format!("[ {} ]", b.name);
        let w = UnicodeWidthStr::width(text.as_str()) + 1;
        if used + w > width && !spans.is_empty() {
            out.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        }
        let style = if i == selected && focused {
            Style::default()
                .fg(th.selected_fg)
                .bg(th.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else if i == selected {
            Style::default()
                .fg(th.border_focus)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
        used += w;
    }
    if !spans.is_empty() {
        out.push(Line::from(spans));
    }
    out
}

fn draw_error(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.error));
    let msg = app.error_message.as_deref().unwrap_or(ERROR_NOT_FOUND);
    let pad = (area.height.saturating_sub(4) / 2) as usize;
    let mut lines = vec![Line::default(); pad];
    lines.push(
        Line::from(Span::styled(
            ERROR_STATUS,
            Style::default().fg(th.error).add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );
    lines.push(Line::from(Span::raw(msg.to_string())).centered());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let region = app.region.as_deref().unwrap_or(REGION_ALL);
    let text = build_status_line(
        app.theme.name(),
        region,
        app.result_count,
        app.nav.len(),
        app.loading,
        area.width.saturating_sub(1),
    );
    let para = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(th.text_dim),
    )));
    f.render_widget(para, area);
}

fn draw_region_picker(f: &mut Frame, area: Rect, state: &RegionPickerState, th: &Theme) {
    let popup_area = centered_rect(40, 50, area);
    let block = Block::default()
        .title(title_span(TITLE_REGION_PICKER, th))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.border_focus));

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(format!(">> {}", state.buffer)));
    let max_list = popup_area.height.saturating_sub(3) as usize;
    for (i, r) in state.filtered.iter().take(max_list).enumerate() {
        let sel = i == state.selected;
        let style = if sel {
            Style::default()
                .fg(th.selected_fg)
                .bg(th.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}", if sel { ">" } else { " " }, r),
            style,
        )));
    }
    let para = Paragraph::new(lines)
        .style(Style::default().bg(th.bg).fg(th.text))
        .block(block);
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
    let cursor_x = popup_area.x
        + 3
        + UnicodeWidthStr::width(
            state
                .buffer
                .graphemes(true)
                .take(state.cursor)
                .collect::<String>()
                .as_str(),
        ) as u16;
    f.set_cursor_position(Position::new(cursor_x, popup_area.y + 1));
}

fn draw_help(f: &mut Frame, area: Rect, th: &Theme) {
    let popup_area = centered_rect(70, 70, area);
    let block = Block::default()
        .title(title_span(TITLE_HELP, th))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.border_focus));
    let lines = help_lines_ascii()
        .iter()
        .map(|s| Line::from(*s))
        .collect::<Vec<Line>>();
    let para = Paragraph::new(lines)
        .style(Style::default().bg(th.bg).fg(th.text))
        .block(block);
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}
