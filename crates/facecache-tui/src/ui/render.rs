use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use facecache_core::config::BASE_URL_ENV;

use crate::app::{App, AppState, Page};

use super::pages::{person, persons};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Breadcrumbs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_breadcrumbs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if app.page == Page::Person && app.lightbox_open() {
        person::render_lightbox(frame, app, centered_rect_fixed(72, 16, frame.area()));
    }

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingClear => render_confirm_overlay(
            frame,
            "Clear all cached data?",
            "Persons, photo lists, URLs and seen photos",
            "to clear",
        ),
        AppState::ConfirmingQuit => render_confirm_overlay(frame, "Are you sure you want to quit?", "", "to quit"),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  facecache";
    let right = format!("API: {}  [?] Help", app.config.display_api_url());
    let title_len = title.chars().count() + right.chars().count();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(title_len + 2))),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_breadcrumbs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled("Persons", styles::breadcrumb_style(app.page == Page::Persons)),
    ];

    if let (Page::Person, Some(detail)) = (app.page, app.person.as_ref()) {
        spans.push(Span::styled(" › ", styles::muted_style()));
        spans.push(Span::styled(detail.person_id().to_string(), styles::breadcrumb_style(true)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if !app.is_configured() {
        render_setup_required(frame, app, area);
        return;
    }

    match app.page {
        Page::Persons => persons::render(frame, app, area),
        Page::Person => person::render(frame, app, area),
    }
}

/// Shown instead of any page when there is no usable base URL.
fn render_setup_required(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("API not configured", styles::highlight_style())),
        Line::from(""),
        Line::from("Set the backend base URL to browse persons:"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  export ", styles::muted_style()),
            Span::styled(format!("{}=https://api.example.com/prod", BASE_URL_ENV), styles::help_key_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "or set \"api_base_url\" in ~/.config/facecache/config.json, then restart.",
            styles::muted_style(),
        )),
    ];

    if let Some(ref error) = app.api_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.clone(), styles::error_style())));
    }

    let block = Block::default()
        .title(" Setup ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        match app.persons.cache_age_display() {
            Some(age) => format!(" Persons cached {} ", age),
            None => " Not loaded ".to_string(),
        }
    };

    let shortcuts = match app.page {
        Page::Persons => "[l]oad | [r]efresh | [c]lear | [q]uit",
        Page::Person if app.lightbox_open() => "←/→ navigate | [Esc] close",
        Page::Person => "[r]efresh | [g]lobal clear | [Esc] back",
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 27, frame.area());

    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  facecache", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓", "Navigate list"),
        help_line("PgUp/PgDn", "Scroll a page"),
        help_line("Enter", "Open person / photo"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Persons", styles::highlight_style())),
        help_line("/", "Search by person id"),
        help_line("s", "Toggle sort by photo count"),
        help_line("l", "Load (cache first)"),
        help_line("r", "Force refresh / retry"),
        help_line("c", "Clear all cached data"),
        Line::from(""),
        Line::from(Span::styled(" Person", styles::highlight_style())),
        help_line("l / r", "Load / force refresh photos"),
        help_line("g", "Clear photo URLs and seen photos"),
        help_line("←/→", "Previous/next photo in viewer"),
        Line::from(""),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_confirm_overlay(frame: &mut Frame, question: &str, detail: &str, action: &str) {
    let area = centered_rect_fixed(50, 8, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", question), styles::highlight_style())),
        Line::from(Span::styled(format!("   {}", detail), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(format!(" {}, ", action), styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
