//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, EditForm, Focus, FormField, Mode, SidebarEntry};
use crate::audio::PlaybackState;
use crate::config::UiSettings;
use crate::library::{Sound, UNCATEGORIZED, format_duration};

const CONTROLS: [(&str, &str); 14] = [
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("tab", "sounds/tags"),
    ("enter/space", "play/stop or toggle tag"),
    ("/", "search"),
    ("x", "clear filters"),
    ("e", "edit"),
    ("t", "add tag"),
    ("T", "remove tag"),
    ("d", "delete"),
    ("i", "import"),
    ("R", "reload"),
    ("q", "quit"),
    ("esc", "cancel"),
];

/// What the renderer needs from the catalog and the player for one frame.
pub struct View<'a> {
    /// Filtered sounds in display order.
    pub visible: &'a [&'a Sound],
    pub sidebar: &'a [(SidebarEntry, usize)],
    pub playing: PlaybackState,
}

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Compute the window of rows to render so the selected one stays centered.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// One list row: marker, name, category, duration, tags, and optionally notes.
fn sound_item<'a>(sound: &'a Sound, playing: bool, show_notes: bool) -> ListItem<'a> {
    let marker = if playing { "▶ " } else { "  " };
    let category = sound.category.as_deref().unwrap_or(UNCATEGORIZED);
    let mut spans = vec![
        Span::raw(marker),
        Span::raw(sound.name.as_str()).bold(),
        Span::raw(format!("  [{category}]")),
        Span::raw(format!("  {}", format_duration(sound.duration))),
    ];
    if !sound.tags.is_empty() {
        spans.push(Span::raw(format!("  #{}", sound.tags.join(" #"))).italic());
    }

    let mut lines = vec![Line::from(spans)];
    if show_notes && !sound.notes.trim().is_empty() {
        lines.push(Line::from(format!("    {}", sound.notes.trim())).dim());
    }
    ListItem::new(lines)
}

fn status_text(app: &App, view: &View<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();

    match view.playing {
        PlaybackState::Playing(id) => {
            let name = view
                .visible
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.name.as_str())
                .unwrap_or("(hidden by filter)");
            parts.push(format!("Playing: {name}"));
        }
        PlaybackState::Idle => parts.push("Idle".to_string()),
    }

    parts.push(format!("Showing: {}", view.visible.len()));
    if let Some(filters) = app.filter_summary() {
        parts.push(filters);
    }
    if app.mode == Mode::Search {
        parts.push(format!("/{}", app.query));
    }
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, view: &View<'_>, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" sfx-memory ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(1)])
        .split(chunks[1]);

    draw_sidebar(frame, app, view, body[0]);
    draw_sounds(frame, app, view, ui_settings, body[1]);

    let status = Paragraph::new(status_text(app, view))
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[2]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    match &app.mode {
        Mode::Prompt { kind, input } => draw_prompt(frame, kind.title(), input, chunks[1]),
        Mode::ConfirmDelete(id) => {
            let name = view
                .visible
                .iter()
                .find(|s| s.id == *id)
                .map(|s| s.name.as_str())
                .unwrap_or("this sound");
            draw_prompt(frame, " delete? (y/n) ", &format!("Delete {name}?"), chunks[1]);
        }
        Mode::Edit(form) => draw_editor(frame, form, chunks[1]),
        Mode::Browse | Mode::Search => {}
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

fn draw_sidebar(frame: &mut Frame, app: &App, view: &View<'_>, area: Rect) {
    let items: Vec<ListItem> = view
        .sidebar
        .iter()
        .map(|(entry, count)| {
            let mark = if app.is_entry_active(entry) { "●" } else { " " };
            ListItem::new(format!("{mark} {} ({count})", entry.label()))
        })
        .collect();

    let list = List::new(items)
        .block(focus_block(" tags ", app.focus == Focus::Tags))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if app.focus == Focus::Tags && !view.sidebar.is_empty() {
        state.select(Some(app.sidebar_cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_sounds(frame: &mut Frame, app: &App, view: &View<'_>, ui: &UiSettings, area: Rect) {
    let show_notes = ui.show_notes && app.show_notes;
    let total = view.visible.len();
    // Rows can span two lines with notes; budget conservatively.
    let rows = if show_notes {
        area.height as usize / 2
    } else {
        area.height as usize
    };
    let (start, end) = visible_window(total, rows.saturating_sub(1).max(1), app.selected);

    let items: Vec<ListItem> = view.visible[start..end]
        .iter()
        .map(|s| sound_item(s, view.playing.is_playing(&s.id), show_notes))
        .collect();

    let title = if total == 0 {
        " sounds (import with i) ".to_string()
    } else {
        format!(" sounds ({total}) ")
    };
    let list = List::new(items)
        .block(focus_block(&title, app.focus == Focus::Sounds))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.selected.saturating_sub(start)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_prompt(frame: &mut Frame, title: &str, text: &str, area: Rect) {
    let popup = centered_rect_sized(60, 3, area);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(left_pad()),
    );
    frame.render_widget(paragraph, popup);
}

fn form_line<'a>(form: &EditForm, field: FormField, value: String) -> Line<'a> {
    let label = format!("{:>9}: ", field.label());
    if form.field == field {
        Line::from(vec![
            Span::raw(label).bold(),
            Span::raw(value).reversed(),
        ])
    } else {
        Line::from(vec![Span::raw(label), Span::raw(value)])
    }
}

fn draw_editor(frame: &mut Frame, form: &EditForm, area: Rect) {
    let popup = centered_rect_sized(72, 10, area);
    frame.render_widget(Clear, popup);

    let category = if form.category.trim().is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        form.category.clone()
    };
    let tags = if form.tags.is_empty() {
        form.tag_input.clone()
    } else {
        format!("#{} {}", form.tags.join(" #"), form.tag_input)
    };

    let lines = vec![
        form_line(form, FormField::Name, form.name.clone()),
        form_line(form, FormField::Category, format!("{category}  (up/down)")),
        form_line(form, FormField::Notes, form.notes.clone()),
        form_line(form, FormField::Tags, tags),
        Line::from(""),
        Line::from("[tab] next field  [enter/ctrl-s] save  [esc] cancel").dim(),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" edit sound ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}
