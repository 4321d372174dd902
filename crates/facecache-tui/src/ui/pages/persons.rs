use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use facecache_core::utils::truncate_string;
use facecache_core::LoadStatus;

use crate::app::{App, AppState};
use crate::ui::styles;

const PERSON_ID_WIDTH: usize = 40;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.state == AppState::Searching;
    let show_search = searching || !app.persons.search_query.is_empty();
    let show_error = app.persons.status() == LoadStatus::Error;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if show_search { 3 } else { 0 }),
            Constraint::Length(if show_error { 3 } else { 0 }),
            Constraint::Min(3),
        ])
        .split(area);

    if show_search {
        render_search_bar(frame, app, searching, chunks[0]);
    }
    if show_error {
        render_error_banner(frame, app, chunks[1]);
    }
    render_person_list(frame, app, chunks[2]);
}

fn render_search_bar(frame: &mut Frame, app: &App, searching: bool, area: Rect) {
    let cursor = if searching { "▌" } else { "" };
    let line = Line::from(vec![
        Span::styled(" / ", styles::muted_style()),
        Span::styled(format!("{}{}", app.persons.search_query, cursor), styles::search_style()),
    ]);

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_error_banner(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.persons.error().unwrap_or("Failed to load persons");
    let line = Line::from(vec![
        Span::styled(format!(" {} ", message), styles::error_style()),
        Span::styled(" [r] retry", styles::help_key_style()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(line).block(block).wrap(Wrap { trim: true }), area);
}

fn render_person_list(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.persons.visible_persons();
    let total = app.persons.persons().len();

    let block = Block::default()
        .title(format!(" Persons ({}/{}) · {} ", visible.len(), total, app.persons.sort_order.label()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state != AppState::Searching));

    if visible.is_empty() {
        let message = empty_message(app);
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, person)| {
            let line = Line::from(vec![
                Span::raw(format!(
                    " {:<width$} ",
                    truncate_string(&person.person_id, PERSON_ID_WIDTH),
                    width = PERSON_ID_WIDTH
                )),
                Span::styled(person.photo_count_display(), styles::muted_style()),
            ]);

            let style = if i == app.persons_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.persons_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Text for an empty list, telling "nothing loaded yet" apart from "nothing matches".
fn empty_message(app: &App) -> String {
    let persons = &app.persons;
    if !persons.has_loaded() {
        return match persons.status() {
            LoadStatus::Loading => "Loading persons...".to_string(),
            LoadStatus::Error => "Could not load persons. Press r to retry.".to_string(),
            _ => "No persons loaded. Press l to load.".to_string(),
        };
    }
    if persons.persons().is_empty() {
        "No persons found.".to_string()
    } else {
        format!("No persons match \"{}\".", persons.search_query)
    }
}
