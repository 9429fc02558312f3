//! Reusable UI widgets for basket
//!
//! - Popup dialogs (confirm, error, scrollable text)
//! - Status bar and flash messages
//! - Spinner frames
//! - Layout helpers

use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current spinner glyph, advancing every 100 ms
pub fn spinner_frame() -> &'static str {
    let idx = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        / 100) as usize
        % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}

/// Render a centered popup dialog
pub fn render_popup(
    frame: &mut Frame,
    title: &str,
    content: Vec<Line>,
    buttons: &[(&str, char)],
    theme: &Theme,
    area: Rect,
) {
    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = (content.len() as u16 + 6).min(area.height.saturating_sub(2));
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .style(theme.block_style())
        .title(format!(" {} ", title))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    frame.render_widget(block, popup_area);

    let inner = Rect {
        x: popup_area.x + 2,
        y: popup_area.y + 1,
        width: popup_area.width.saturating_sub(4),
        height: popup_area.height.saturating_sub(4),
    };

    let content_widget = Paragraph::new(content)
        .style(theme.text())
        .wrap(Wrap { trim: false });
    frame.render_widget(content_widget, inner);

    if !buttons.is_empty() && popup_area.height >= 3 {
        let button_area = Rect {
            x: popup_area.x + 2,
            y: popup_area.y + popup_area.height - 2,
            width: popup_area.width.saturating_sub(4),
            height: 1,
        };

        let button_spans: Vec<Span> = buttons
            .iter()
            .enumerate()
            .flat_map(|(i, (label, key))| {
                let mut spans = vec![
                    Span::styled("[", theme.text_dim()),
                    Span::styled(
                        key.to_string(),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("] ", theme.text_dim()),
                    Span::styled(*label, theme.text()),
                ];
                if i < buttons.len() - 1 {
                    spans.push(Span::raw("    "));
                }
                spans
            })
            .collect();

        let buttons_widget =
            Paragraph::new(Line::from(button_spans)).alignment(Alignment::Center);
        frame.render_widget(buttons_widget, button_area);
    }
}

/// Render a yes/no confirmation
pub fn render_confirm_popup(
    frame: &mut Frame,
    title: &str,
    question: &str,
    detail: Option<&str>,
    confirm_label: &str,
    theme: &Theme,
    area: Rect,
) {
    let mut content = vec![Line::raw(""), Line::styled(question, theme.text())];
    if let Some(detail) = detail {
        content.push(Line::raw(""));
        content.push(Line::styled(
            format!("  {}", detail),
            theme.title(),
        ));
    }

    render_popup(
        frame,
        title,
        content,
        &[(confirm_label, 'y'), ("Cancel", 'n')],
        theme,
        area,
    );
}

/// Render an error popup
pub fn render_error_popup(
    frame: &mut Frame,
    title: &str,
    message: &str,
    theme: &Theme,
    area: Rect,
) {
    let content = vec![
        Line::raw(""),
        Line::styled(message, theme.error()),
    ];

    render_popup(frame, title, content, &[("OK", 'o')], theme, area);
}

/// Large popup for long text (recipes), scrolled by whole lines
pub fn render_text_popup(
    frame: &mut Frame,
    title: &str,
    text: &str,
    scroll: usize,
    theme: &Theme,
    area: Rect,
) {
    let popup_width = (area.width * 4 / 5).max(20).min(area.width);
    let popup_height = (area.height * 4 / 5).max(6).min(area.height);
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<&str> = text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible_height);
    let scroll = scroll.min(max_scroll);

    let visible_text: String = lines
        .iter()
        .skip(scroll)
        .take(visible_height)
        .cloned()
        .collect::<Vec<&str>>()
        .join("\n");

    let scroll_indicator = if lines.len() > visible_height {
        format!(" (j/k) [{}/{}]", scroll + 1, max_scroll + 1)
    } else {
        String::new()
    };

    let body = Paragraph::new(visible_text)
        .style(theme.text())
        .block(
            Block::default()
                .style(theme.block_style())
                .borders(Borders::ALL)
                .border_style(theme.border_focused())
                .title(format!(" {} ", title))
                .title_style(theme.title())
                .title_bottom(Line::styled(
                    format!("{} [o] OK ", scroll_indicator),
                    theme.text_dim(),
                )),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body, popup_area);
}

/// Render a flash message at the bottom of the screen
pub fn render_flash_message(
    frame: &mut Frame,
    message: &str,
    is_error: bool,
    theme: &Theme,
    area: Rect,
) {
    let style = if is_error { theme.error() } else { theme.success() };
    let prefix = if is_error { "✗ " } else { "✓ " };

    let flash_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, flash_area);
    let flash = Paragraph::new(Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(message, style),
    ]))
    .style(theme.block_style());
    frame.render_widget(flash, flash_area);
}

/// Render status bar at bottom
pub fn render_status_bar(
    frame: &mut Frame,
    left_content: &str,
    right_content: &str,
    theme: &Theme,
    area: Rect,
) {
    let status_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, status_area);

    let left_widget = Paragraph::new(left_content).style(theme.text_dim());

    let right_len = right_content.chars().count() as u16;
    let right_area = Rect {
        x: status_area.x + status_area.width.saturating_sub(right_len + 1),
        y: status_area.y,
        width: (right_len + 1).min(status_area.width),
        height: 1,
    };
    let right_widget = Paragraph::new(right_content).style(theme.text_dim());

    frame.render_widget(left_widget, status_area);
    frame.render_widget(right_widget, right_area);
}

/// Helper: Create a centered rect of given size
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}
