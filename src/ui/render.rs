//! Main rendering module for basket
//!
//! Renders the complete UI:
//! - Header with counts (and the all-done banner)
//! - Input line
//! - Item list in display order
//! - Action footer + global status bar
//! - Popup overlays + flash messages

use crate::app::{App, PopupState};
use crate::ui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const INPUT_PLACEHOLDER: &str = "e.g., Avocados";

/// Main render function – entry point for all UI rendering
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let theme = &app.theme;

    // Fill entire background
    frame.render_widget(Block::default().style(theme.block_style()), area);

    let vertical = Layout::vertical([
        Constraint::Length(2), // header
        Constraint::Length(3), // input
        Constraint::Min(3),    // list
        Constraint::Length(1), // actions
        Constraint::Length(1), // status bar
    ])
    .split(area);

    render_header(frame, app, vertical[0]);
    render_input(frame, app, vertical[1]);
    render_list(frame, app, vertical[2]);
    render_actions(frame, app, vertical[3]);
    render_status_bar(frame, app, vertical[4]);

    render_popups(frame, app, area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let open = app.store.len() - app.store.completed_count();
    let done = app.store.completed_count();

    let mut spans = vec![
        Span::styled(
            " 🛒 Grocery List",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("   {} open · {} done", open, done), theme.text_dim()),
    ];

    if app.store.all_completed() {
        spans.push(Span::styled(
            "   🎉 All done! Nice shopping.",
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(theme.block_style()),
        area,
    );
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let (border_style, title) = if app.input_mode {
        (theme.border_focused(), " Add item (Enter add · Esc done) ")
    } else {
        (theme.border(), " Add item [i] ")
    };

    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(theme.title());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = if app.input_buffer.is_empty() {
        Paragraph::new(INPUT_PLACEHOLDER).style(theme.text_dim())
    } else {
        Paragraph::new(app.input_buffer.as_str()).style(theme.text())
    };
    frame.render_widget(input, inner);

    if app.input_mode && inner.width > 0 {
        let len = app.input_buffer.chars().count() as u16;
        frame.set_cursor_position(ratatui::layout::Position::new(
            inner.x + len.min(inner.width.saturating_sub(1)),
            inner.y,
        ));
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::ALL)
        .border_style(if app.input_mode {
            theme.border()
        } else {
            theme.border_focused()
        });

    if app.store.is_empty() {
        let hint = Paragraph::new(vec![
            Line::raw(""),
            Line::styled("Your list is empty.", theme.text()),
            Line::styled("Press [i] to add an item.", theme.text_dim()),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .sorted()
        .into_iter()
        .map(|item| {
            let line = if item.is_completed {
                Line::from(vec![
                    Span::styled(" ✔ ", theme.success()),
                    Span::styled(item.text.clone(), theme.completed()),
                ])
            } else {
                Line::from(vec![
                    Span::styled(" ○ ", theme.text_dim()),
                    Span::styled(item.text.clone(), theme.text()),
                ])
            };
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(theme.block_style())
        .highlight_style(theme.selected())
        .highlight_symbol("▸");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_actions(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )
    };

    let recipe = if app.recipe_waiting() {
        vec![
            Span::styled(format!("{} ", widgets::spinner_frame()), theme.warning()),
            Span::styled("Generating recipe… [Esc] stop waiting", theme.text_dim()),
        ]
    } else if app.recipe_loading {
        vec![Span::styled("[r] Recipe idea (finishing last request)", theme.text_dim())]
    } else {
        vec![key("[r]"), Span::styled(" Recipe idea", theme.text())]
    };

    let mut spans = vec![
        Span::raw(" "),
        key("[c]"),
        Span::styled(" Clear completed    ", theme.text()),
    ];
    spans.extend(recipe);
    spans.push(Span::raw("    "));
    spans.push(key("[n]"));
    spans.push(Span::styled(" Remind me", theme.text()));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(theme.block_style()),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if let Some(flash) = &app.flash_message {
        widgets::render_flash_message(frame, &flash.text, flash.is_error, theme, area);
        return;
    }

    let left = if app.input_mode {
        " type an item · Enter add · Esc leave input"
    } else {
        " j/k move · Space toggle · d delete · t theme · q quit"
    };
    let right = format!(
        "{} · basket v{} ",
        app.config.theme.as_str(),
        env!("CARGO_PKG_VERSION")
    );
    widgets::render_status_bar(frame, left, &right, theme, area);
}

fn render_popups(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    match &app.popup {
        PopupState::None => {}
        PopupState::ConfirmDelete { text, .. } => widgets::render_confirm_popup(
            frame,
            "Delete Item",
            "Are you sure you want to delete this?",
            Some(text.as_str()),
            "Delete",
            theme,
            area,
        ),
        PopupState::ConfirmClear { count } => {
            let detail = format!("{} completed item(s)", count);
            widgets::render_confirm_popup(
                frame,
                "Clear Completed",
                "Are you sure you want to clear all completed items?",
                Some(&detail),
                "Clear",
                theme,
                area,
            );
        }
        PopupState::Message {
            title,
            message,
            scroll,
        } => widgets::render_text_popup(frame, title, message, *scroll, theme, area),
        PopupState::Error { title, message } => {
            widgets::render_error_popup(frame, title, message, theme, area)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::groceries::store::Item;
    use crate::groceries::{BlobStore, ItemStore};
    use crate::services::recipe::ChatBackend;
    use crate::services::reminder::{Notifier, Permission};
    use anyhow::Result;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    struct NullStore;

    impl BlobStore for NullStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }
    }

    struct NullNotifier;

    impl Notifier for NullNotifier {
        fn request_permission(&self) -> Permission {
            Permission::Denied
        }

        fn schedule(&self, _delay: Duration, _title: &str, _body: &str) -> Result<()> {
            Ok(())
        }
    }

    struct NullBackend;

    impl ChatBackend for NullBackend {
        fn post_json(
            &self,
            _url: &str,
            _api_key: &str,
            _body: &serde_json::Value,
        ) -> Result<serde_json::Value> {
            anyhow::bail!("offline")
        }
    }

    fn app_with(items: Vec<Item>) -> App {
        let mut app = App::new(
            Config::default(),
            Box::new(NullStore),
            Box::new(NullNotifier),
            Arc::new(NullBackend),
        );
        app.store = ItemStore::from_items(items);
        app
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_empty_list_hint() {
        let text = screen_text(&app_with(Vec::new()));
        assert!(text.contains("Your list is empty."));
        assert!(text.contains(INPUT_PLACEHOLDER));
    }

    #[test]
    fn test_items_and_banner() {
        let app = app_with(vec![Item {
            id: "1".to_string(),
            text: "Avocados".to_string(),
            is_completed: true,
        }]);
        let text = screen_text(&app);
        assert!(text.contains("Avocados"));
        assert!(text.contains("All done!"));
    }

    #[test]
    fn test_confirm_popup_renders() {
        let mut app = app_with(Vec::new());
        app.popup = PopupState::ConfirmClear { count: 2 };
        let text = screen_text(&app);
        assert!(text.contains("Clear Completed"));
    }
}
