use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use facecache_core::utils::{is_presigned_url_expired, presigned_url_expiry, truncate_string};
use facecache_core::{LoadStatus, PersonDetailController, Photo};

use crate::app::App;
use crate::ui::styles;

const PHOTO_ID_WIDTH: usize = 36;

const EXPIRED_MESSAGE: &str = "URL expired, force refresh to get new presigned URLs";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = app.person.as_ref() else {
        return;
    };

    let show_error = detail.status() == LoadStatus::Error;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(if show_error { 3 } else { 0 }), Constraint::Min(3)])
        .split(area);

    if show_error {
        let message = detail.error().unwrap_or("Failed to load photos");
        let line = Line::from(vec![
            Span::styled(format!(" {} ", message), styles::error_style()),
            Span::styled(" [r] retry", styles::help_key_style()),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::error_style());
        frame.render_widget(Paragraph::new(line).block(block).wrap(Wrap { trim: true }), rows[0]);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_photo_list(frame, app, detail, columns[0]);
    render_photo_detail(frame, detail.photos().get(app.photo_selection), columns[1]);
}

fn render_photo_list(frame: &mut Frame, app: &App, detail: &PersonDetailController, area: Rect) {
    let photos = detail.photos();
    let seen_count = photos.iter().filter(|p| detail.is_seen(&p.photo_id)).count();

    let block = Block::default()
        .title(format!(" Photos ({}) · {} seen elsewhere ", photos.len(), seen_count))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if photos.is_empty() {
        let message = if detail.has_loaded() {
            "No photos for this person."
        } else if detail.is_loading() {
            "Loading photos..."
        } else {
            "No photos loaded. Press l to load."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style()))).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = photos
        .iter()
        .enumerate()
        .map(|(i, photo)| {
            let mut spans = vec![Span::raw(format!(
                " {:>3}. {:<width$} ",
                i + 1,
                truncate_string(&photo.photo_id, PHOTO_ID_WIDTH),
                width = PHOTO_ID_WIDTH
            ))];
            if detail.is_seen(&photo.photo_id) {
                spans.push(Span::styled("[seen]", styles::seen_style()));
            }

            let style = if i == app.photo_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.photo_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn field_line(label: &'static str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<8}", label), styles::highlight_style()),
        Span::raw(value.to_string()),
    ])
}

fn render_photo_detail(frame: &mut Frame, photo: Option<&Photo>, area: Rect) {
    let block = Block::default()
        .title(" Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(photo) = photo else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let expiry = match presigned_url_expiry(&photo.photo_url) {
        Some(at) if at <= Utc::now() => Span::styled("expired", styles::error_style()),
        Some(at) => Span::raw(at.format("%Y-%m-%d %H:%M UTC").to_string()),
        None => Span::styled("unknown", styles::muted_style()),
    };

    let lines = vec![
        field_line("Id", &photo.photo_id),
        field_line("Bucket", &photo.photo_bucket),
        field_line("Key", &photo.photo_key),
        field_line("Thumb", &photo.thumb_key),
        Line::from(vec![Span::styled(format!("{:<8}", "Expires"), styles::highlight_style()), expiry]),
        Line::from(""),
        Line::from(Span::styled("Preview", styles::highlight_style())),
        Line::from(Span::styled(photo.preview_url().to_string(), styles::muted_style())),
    ];

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

/// Full-size viewer overlay. A terminal cannot draw the image, so this shows
/// the photo's location, or the expiry notice when its URL has lapsed.
pub fn render_lightbox(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = app.person.as_ref() else {
        return;
    };
    let Some(photo) = detail.current_photo() else {
        return;
    };
    let lightbox = detail.lightbox();
    let len = detail.photos().len();

    frame.render_widget(Clear, area);

    let mut lines = vec![
        field_line("Photo", &photo.photo_id),
        field_line("Key", &photo.photo_key),
        Line::from(""),
    ];

    if lightbox.image_error() || is_presigned_url_expired(&photo.photo_url, Utc::now()) {
        lines.push(Line::from(Span::styled(EXPIRED_MESSAGE, styles::error_style())));
    } else {
        lines.push(Line::from(Span::raw(photo.photo_url.clone())));
    }

    if detail.is_seen(&photo.photo_id) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Also appears under another person", styles::seen_style())));
    }

    lines.push(Line::from(""));
    let prev = if lightbox.has_prev() { "◀ prev" } else { "      " };
    let next = if lightbox.has_next(len) { "next ▶" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(prev, styles::help_key_style()),
        Span::raw("    "),
        Span::styled(next, styles::help_key_style()),
    ]));

    let block = Block::default()
        .title(format!(" {} ", lightbox.position_label(len)))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_message_is_plain_ascii() {
        assert!(EXPIRED_MESSAGE.is_ascii());
        assert!(EXPIRED_MESSAGE.starts_with("URL expired"));
    }
}
