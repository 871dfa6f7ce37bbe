//! Scrollable, refreshable data table
//!
//! `TableView` renders an optional title row, a header row and one line per
//! record. Columns may supply their own renderer; otherwise the raw field
//! value is shown. When the columns are wider than the viewport the table
//! scrolls horizontally. Pulling (`r`, or scrolling up past the top) runs
//! the refresh callback in the background and shows a spinner until it
//! finishes.

use crate::action::Action;
use crate::component::Component;
use crate::components::cell::{cell_spans, header_label, rule_line, single_line, title_line};
use crate::model::{cell_text, content_width, Column, Record, RefreshControl, RefreshState};
use crate::services::{RefreshCallback, RefreshOutcome, RefreshRunner};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use log::{debug, info};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const HORIZONTAL_STEP: u16 = 4;

pub struct TableView<T, H> {
    title: Option<String>,
    rows: Vec<T>,
    columns: Vec<Column<T, H>>,
    /// Handed to every custom renderer, never inspected here
    instance: H,
    on_refresh: Option<RefreshCallback>,
    refresh: RefreshControl,
    runner: RefreshRunner,
    /// Sum of column widths, cached per column set
    content_width: u16,
    viewport_width: u16,
    /// Body rows that fit on screen, as of the last draw
    visible_rows: usize,
    cursor: usize,
    scroll: usize,
    h_scroll: u16,
    spinner_frame: usize,
}

impl<T: Record, H> TableView<T, H> {
    pub fn new(instance: H) -> Self {
        Self {
            title: None,
            rows: Vec::new(),
            columns: Vec::new(),
            instance,
            on_refresh: None,
            refresh: RefreshControl::new(),
            runner: RefreshRunner::new(),
            content_width: 0,
            viewport_width: 0,
            visible_rows: 0,
            cursor: 0,
            scroll: 0,
            h_scroll: 0,
            spinner_frame: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_refresh_title(mut self, label: impl Into<String>) -> Self {
        self.refresh.set_label(label);
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column<T, H>>) -> Self {
        self.set_columns(columns);
        self
    }

    pub fn with_rows(mut self, rows: Vec<T>) -> Self {
        self.set_rows(rows);
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.set_loading(loading);
        self
    }

    pub fn with_on_refresh<F>(mut self, callback: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_refresh = Some(std::sync::Arc::new(callback));
        self
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn set_on_refresh(&mut self, callback: Option<RefreshCallback>) {
        self.on_refresh = callback;
    }

    /// Replace the column set and recompute the scroll decision
    pub fn set_columns(&mut self, columns: Vec<Column<T, H>>) {
        self.columns = columns;
        self.content_width = content_width(&self.columns);
        self.clamp_horizontal();
        debug!(
            "table columns set: {} columns, {} cells wide",
            self.columns.len(),
            self.content_width
        );
    }

    /// Replace the rows, keeping the cursor on the same record if it survives
    pub fn set_rows(&mut self, rows: Vec<T>) {
        let selected = self.selected_id();
        self.rows = rows;
        self.cursor = selected
            .and_then(|id| self.rows.iter().position(|r| r.id() == id))
            .unwrap_or(0);
        self.ensure_cursor_visible();
    }

    /// Reconcile with the host's loading flag
    pub fn set_loading(&mut self, loading: bool) {
        self.refresh.sync_loading(loading);
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        if width != self.viewport_width {
            self.viewport_width = width;
            self.clamp_horizontal();
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<T, H>] {
        &self.columns
    }

    pub fn instance(&self) -> &H {
        &self.instance
    }

    pub fn content_width(&self) -> u16 {
        self.content_width
    }

    pub fn is_horizontal_scroll(&self) -> bool {
        self.content_width > self.viewport_width
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn horizontal_offset(&self) -> u16 {
        self.h_scroll
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    pub fn refresh_title(&self) -> &str {
        self.refresh.label()
    }

    pub fn selected(&self) -> Option<&T> {
        self.rows.get(self.cursor)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected().map(Record::id)
    }

    /// Start a refresh. Returns false if one is already in progress.
    pub fn pull_refresh(&mut self) -> bool {
        if !self.refresh.pull() {
            return false;
        }
        info!("refresh started");
        self.spinner_frame = 0;
        self.runner.spawn(self.on_refresh.clone());
        true
    }

    /// Finish the refresh if its callback has completed
    pub fn poll_refresh(&mut self) -> Option<RefreshOutcome> {
        let outcome = self.runner.poll()?;
        self.refresh.finish();
        Some(outcome)
    }

    /// Header content per column, before fitting to the column width
    pub fn header_cells(&self) -> Vec<Line<'static>> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| match (&column.title, &column.render) {
                (Some(title), _) => header_label(title),
                (None, Some(render)) => render(&T::default(), index, &self.instance),
                (None, None) => Line::default(),
            })
            .collect()
    }

    /// Cell content per column for one record, before fitting
    pub fn row_cells(&self, record: &T) -> Vec<Line<'static>> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| match &column.render {
                Some(render) => render(record, index, &self.instance),
                None => Line::from(single_line(&cell_text(record, &column.data_index))),
            })
            .collect()
    }

    /// Title row (if any), header row and rule
    pub fn header_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            lines.push(title_line(title, self.content_width));
        }

        // Header content is always centered, whatever the column alignment
        lines.push(self.layout_row(self.header_cells(), Some(Alignment::Center)));
        lines.push(rule_line(self.content_width));
        lines
    }

    /// One line per record, the cursor row highlighted
    pub fn body_lines(&self) -> Vec<Line<'static>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let line = self.layout_row(self.row_cells(record), None);
                if i == self.cursor {
                    line.style(Style::default().bg(Color::DarkGray))
                } else {
                    line
                }
            })
            .collect()
    }

    /// Everything the table shows, top to bottom
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = self.header_lines();
        lines.extend(self.body_lines());
        lines
    }

    fn layout_row(&self, cells: Vec<Line<'static>>, align: Option<Alignment>) -> Line<'static> {
        let spans: Vec<Span<'static>> = self
            .columns
            .iter()
            .zip(cells)
            .flat_map(|(column, content)| {
                let align = align.unwrap_or_else(|| column.align.into());
                cell_spans(content, column.effective_width(), align)
            })
            .collect();
        Line::from(spans)
    }

    fn max_h_scroll(&self) -> u16 {
        self.content_width.saturating_sub(self.viewport_width)
    }

    fn clamp_horizontal(&mut self) {
        if !self.is_horizontal_scroll() {
            self.h_scroll = 0;
        } else {
            self.h_scroll = self.h_scroll.min(self.max_h_scroll());
        }
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.visible_rows.max(1))
    }

    fn ensure_cursor_visible(&mut self) {
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
        let page = self.visible_rows.max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + page {
            self.scroll = self.cursor + 1 - page;
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Drag the cursor along when the body is scrolled without it
    fn keep_cursor_in_view(&mut self) {
        let last_visible = self.scroll + self.page_size() - 1;
        self.cursor = self
            .cursor
            .clamp(self.scroll, last_visible)
            .min(self.rows.len().saturating_sub(1));
    }

    /// Keep the offset in range without re-anchoring it to the cursor
    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
        if !self.rows.is_empty() {
            self.keep_cursor_in_view();
        }
    }

    fn page_size(&self) -> usize {
        self.visible_rows.max(1)
    }
}

impl<T: Record, H> Component for TableView<T, H> {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => {
                // Moving up from the first row is a pull
                if self.cursor == 0 {
                    Some(Action::PullRefresh)
                } else {
                    Some(Action::PrevRow)
                }
            }
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::ScrollLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::ScrollRight),
            KeyCode::Char('r') | KeyCode::F(5) => Some(Action::PullRefresh),
            KeyCode::Char(' ') => self.selected_id().map(Action::ToggleMark),
            KeyCode::Char('a') => Some(Action::ToggleMarkAll),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollLeft => Some(Action::ScrollLeft),
            MouseEventKind::ScrollRight => Some(Action::ScrollRight),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.is_refreshing() {
                    self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
                }
                if let Some(outcome) = self.poll_refresh() {
                    return Ok(Some(Action::RefreshFinished(outcome.is_success())));
                }
            }
            Action::Resize(width, _) => {
                // Borders take one cell on each side
                self.set_viewport_width(width.saturating_sub(2));
            }
            Action::PullRefresh => {
                self.pull_refresh();
            }
            Action::NextRow => {
                if self.cursor + 1 < self.rows.len() {
                    self.cursor += 1;
                }
                self.ensure_cursor_visible();
            }
            Action::PrevRow => {
                self.cursor = self.cursor.saturating_sub(1);
                self.ensure_cursor_visible();
            }
            Action::FirstRow => {
                self.cursor = 0;
                self.ensure_cursor_visible();
            }
            Action::LastRow => {
                self.cursor = self.rows.len().saturating_sub(1);
                self.ensure_cursor_visible();
            }
            Action::ScrollUp => {
                if self.scroll == 0 {
                    self.pull_refresh();
                } else {
                    self.scroll -= 1;
                    self.keep_cursor_in_view();
                }
            }
            Action::ScrollDown => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
                self.keep_cursor_in_view();
            }
            Action::PageDown => {
                let page = self.page_size();
                self.cursor = (self.cursor + page).min(self.rows.len().saturating_sub(1));
                self.ensure_cursor_visible();
            }
            Action::PageUp => {
                let page = self.page_size();
                self.cursor = self.cursor.saturating_sub(page);
                self.ensure_cursor_visible();
            }
            Action::ScrollLeft => {
                self.h_scroll = self.h_scroll.saturating_sub(HORIZONTAL_STEP);
            }
            Action::ScrollRight => {
                if self.is_horizontal_scroll() {
                    self.h_scroll = (self.h_scroll + HORIZONTAL_STEP).min(self.max_h_scroll());
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));

        if self.is_refreshing() {
            block = block.title(Span::styled(
                format!(" {} {} ", SPINNER[self.spinner_frame], self.refresh.label()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.set_viewport_width(inner.width);

        let header = self.header_lines();
        let header_height = (header.len() as u16).min(inner.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_height), Constraint::Min(0)])
            .split(inner);

        let horizontal = self.is_horizontal_scroll();
        let body_area = chunks[1];
        // Bottom line of the body is reserved for the horizontal scrollbar
        self.visible_rows = body_area.height.saturating_sub(u16::from(horizontal)) as usize;
        self.clamp_scroll();

        frame.render_widget(Paragraph::new(header).scroll((0, self.h_scroll)), chunks[0]);

        let body = self.body_lines();
        let total = body.len();
        frame.render_widget(
            Paragraph::new(body).scroll((self.scroll as u16, self.h_scroll)),
            body_area,
        );

        if total > self.visible_rows {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(self.visible_rows)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        if horizontal {
            let mut scrollbar_state = ScrollbarState::new(self.max_h_scroll() as usize)
                .position(self.h_scroll as usize);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::HorizontalBottom)
                    .begin_symbol(Some("←"))
                    .end_symbol(Some("→")),
                body_area,
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}
