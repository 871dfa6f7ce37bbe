//! Help dialog component
//!
//! Lists the table's key bindings in a centered overlay.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const KEY_COLUMN: usize = 12;

/// Key binding overlay
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = build_help_content();
        let height = (content.len() as u16).saturating_add(2);
        let popup_area = centered_popup(area, 52, height);

        frame.render_widget(Clear, popup_area);

        let visible = popup_area.height.saturating_sub(2) as usize;
        self.scroll_offset = self.scroll_offset.min(content.len().saturating_sub(visible));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!(" {}", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    };

    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:width$}", key, width = KEY_COLUMN),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(description.to_string()),
        ]));
    };

    add_section(&mut lines, "Rows");
    add_shortcut(&mut lines, "j / ↓", "Next row");
    add_shortcut(&mut lines, "k / ↑", "Previous row (pull at the top)");
    add_shortcut(&mut lines, "g / G", "First / last row");
    add_shortcut(&mut lines, "Ctrl+d / u", "Page down / up");
    add_shortcut(&mut lines, "h / l", "Scroll left / right");

    add_section(&mut lines, "Refresh");
    add_shortcut(&mut lines, "r / F5", "Pull to refresh");
    add_shortcut(&mut lines, "L", "Toggle loading flag");

    add_section(&mut lines, "Marks");
    add_shortcut(&mut lines, "Space", "Mark / unmark row");
    add_shortcut(&mut lines, "a", "Mark all / clear marks");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit / close dialog");

    lines
}
