//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Drawing also records where the
//! clickable regions ended up ([`App::hit_areas`]) so mouse clicks can be
//! mapped back to cards, fields and the detail view.
//!
//! ## For contributors
//!
//! * Layout: date fields on top, the card list in the middle, a one-line
//!   status bar at the bottom.  The detail view is an overlay drawn last.
//! * Each card is [`CARD_HEIGHT`] lines tall; keep that in sync when
//!   changing [`card_lines`], or click hit-testing will drift.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, CARD_HEIGHT};
use crate::gallery::{excerpt, EXCERPT_CHARS};
use crate::modal::MediaView;
use crate::source::{FeedItem, Media};

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_date_fields(app, frame, header_area);
    draw_gallery(app, frame, main_area);
    draw_status_bar(app, frame, status_area);

    if app.modal.is_open() {
        draw_modal(app, frame);
    } else {
        app.hit_areas.modal = None;
        app.hit_areas.modal_close = None;
    }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

/// Render the start / end date inputs and the fetch hint.
fn draw_date_fields(app: &mut App, frame: &mut Frame, area: Rect) {
    let [start_area, end_area, hint_area] = Layout::horizontal([
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Min(1),
    ])
    .areas(area);

    let editing = !app.modal.is_open();
    let start_focused = editing && app.focus == Focus::StartDate;
    let end_focused = editing && app.focus == Focus::EndDate;

    frame.render_widget(
        Paragraph::new(app.start_input.as_str()).block(field_block(" Start ", start_focused)),
        start_area,
    );
    frame.render_widget(
        Paragraph::new(app.end_input.as_str()).block(field_block(" End ", end_focused)),
        end_area,
    );

    let hint = if app.loading {
        Span::styled(" fetching…", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            " YYYY-MM-DD · end defaults to start + 8 days · Enter: fetch",
            Style::default().fg(Color::DarkGray),
        )
    };
    let [_, hint_row, _] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(hint_area);
    frame.render_widget(Paragraph::new(Line::from(hint)), hint_row);

    // Cursor sits after the typed text of the focused field.
    let cursor = if start_focused {
        Some((start_area, app.start_input.len()))
    } else if end_focused {
        Some((end_area, app.end_input.len()))
    } else {
        None
    };
    if let Some((field, len)) = cursor {
        frame.set_cursor_position((field.x + 1 + len as u16, field.y + 1));
    }

    app.hit_areas.start_field = start_area;
    app.hit_areas.end_field = end_area;
}

/// The lines of one card.  Must stay [`CARD_HEIGHT`] lines long.
fn card_lines(item: &FeedItem) -> Vec<Line<'_>> {
    let media_line = match &item.media {
        Media::Image { url, .. } => Line::from(vec![
            Span::styled("  [image] ", Style::default().fg(Color::Cyan)),
            Span::styled(url.as_str(), Style::default().fg(Color::DarkGray)),
        ]),
        Media::Video {
            thumbnail: Some(thumb),
            ..
        } => Line::from(vec![
            Span::styled("  [video] ", Style::default().fg(Color::Magenta)),
            Span::styled(
                format!("thumbnail {thumb}"),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Media::Video {
            url,
            thumbnail: None,
        } => Line::from(vec![
            Span::styled("  [video] ", Style::default().fg(Color::Magenta)),
            Span::styled(
                format!("no thumbnail · {url}"),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Media::Unsupported { reason, .. } => Line::from(vec![
            Span::styled("  [media not available] ", Style::default().fg(Color::Yellow)),
            Span::styled(reason.as_str(), Style::default().fg(Color::DarkGray)),
        ]),
    };

    vec![
        Line::from(vec![
            Span::styled(
                item.title.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" — {}", item.display_date()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        media_line,
        Line::from(Span::styled(
            format!("  {}", excerpt(&item.explanation, EXCERPT_CHARS)),
            Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
    ]
}

/// Render the card list, or a placeholder when there are no cards.
fn draw_gallery(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Gallery && !app.modal.is_open();
    let block = Block::default()
        .title(format!(" {} ", app.source_name()))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    app.hit_areas.cards = block.inner(area);

    if app.gallery.is_empty() {
        let placeholder = Paragraph::new(app.placeholder())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let (items, list_state) = app.gallery.items_and_state();
    let cards: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(card_lines(item)))
        .collect();
    debug_assert!(cards.iter().all(|c| c.height() == CARD_HEIGHT as usize));

    let list = List::new(cards)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status_style = if app.status_is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let help = if app.modal.is_open() {
        "Esc/q/Enter: close"
    } else {
        match app.focus {
            Focus::StartDate | Focus::EndDate => "Enter: fetch  Tab: next field  Esc: gallery",
            Focus::Gallery => "q: quit  ↑/↓: select  Enter/Space: open  r: refetch  /: edit dates",
        }
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), status_style),
        Span::raw("  "),
        Span::styled(
            format!("{} items", app.gallery.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}

fn centered(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(height_pct)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(width_pct)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn media_lines(media: &MediaView) -> Vec<Line<'_>> {
    let label = |s: &'static str, color: Color| {
        Span::styled(s, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    match media {
        MediaView::Image { url } => vec![Line::from(vec![
            label("Image   ", Color::Cyan),
            Span::raw(url.as_str()),
        ])],
        MediaView::Embedded {
            player_url,
            source_url,
        } => vec![
            Line::from(vec![label("Player  ", Color::Magenta), Span::raw(player_url.as_str())]),
            Line::from(vec![
                label("Source  ", Color::DarkGray),
                Span::styled(source_url.as_str(), Style::default().fg(Color::DarkGray)),
            ]),
        ],
        MediaView::Link { url } => vec![Line::from(vec![
            label("Link    ", Color::Magenta),
            Span::raw(url.as_str()),
        ])],
        MediaView::Placeholder { reason } => vec![Line::from(vec![
            label("Media not available  ", Color::Yellow),
            Span::styled(reason.as_str(), Style::default().fg(Color::DarkGray)),
        ])],
    }
}

/// Render the detail view over the gallery.
fn draw_modal(app: &mut App, frame: &mut Frame) {
    let (Some(item), Some(media)) = (app.modal.item(), app.modal.media()) else {
        return;
    };

    let area = centered(frame.area(), 80, 80);
    let close_area = Rect {
        x: (area.x + area.width).saturating_sub(5),
        y: area.y,
        width: 3.min(area.width),
        height: 1.min(area.height),
    };

    let mut date_line = vec![Span::styled(
        item.display_date(),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(copyright) = &item.copyright {
        date_line.push(Span::styled(
            format!("  © {}", copyright),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(date_line), Line::raw("")];
    lines.extend(media_lines(media));
    lines.push(Line::raw(""));
    lines.push(Line::raw(item.explanation.as_str()));

    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", item.title),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .title_bottom(" Esc: close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
    frame.render_widget(
        Paragraph::new("[x]").style(Style::default().fg(Color::Red)),
        close_area,
    );

    app.hit_areas.modal = Some(area);
    app.hit_areas.modal_close = Some(close_area);
}
