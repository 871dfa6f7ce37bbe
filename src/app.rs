//! Application state
//!
//! Hosts a single `TableView` over `DataRow`s, wires its refresh callback to
//! the configured data source and draws a status bar underneath.

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use log::{info, warn};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use table_view::action::Action;
use table_view::component::Component;
use table_view::components::{calculate_main_layout, HelpDialog, TableView};
use table_view::config::Config;
use table_view::model::{Align, Column, DataRow, Record};
use table_view::services::RefreshCallback;

const MARK_WIDTH: u16 = 5;

#[derive(Debug, Default)]
struct MarkState {
    marked: HashSet<String>,
    total: usize,
}

/// Instance handle given to the table's renderers
///
/// Renderers read the mark state through it; the app changes it in response
/// to actions.
#[derive(Debug, Clone, Default)]
pub struct TableHandle {
    marks: Arc<Mutex<MarkState>>,
}

impl TableHandle {
    fn with_marks<R>(&self, f: impl FnOnce(&mut MarkState) -> R) -> R {
        let mut marks = self.marks.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut marks)
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.with_marks(|m| m.marked.contains(id))
    }

    pub fn all_marked(&self) -> bool {
        self.with_marks(|m| m.total > 0 && m.marked.len() == m.total)
    }

    pub fn marked_count(&self) -> usize {
        self.with_marks(|m| m.marked.len())
    }

    pub fn toggle(&self, id: &str) {
        self.with_marks(|m| {
            if !m.marked.remove(id) {
                m.marked.insert(id.to_string());
            }
        });
    }

    /// Mark every id, or clear everything if all are already marked
    pub fn toggle_all(&self, ids: Vec<String>) {
        let all = self.all_marked();
        self.with_marks(|m| {
            if all {
                m.marked.clear();
            } else {
                m.marked.extend(ids);
            }
        });
    }

    /// Forget marks for rows that no longer exist
    pub fn retain(&self, ids: &[String]) {
        self.with_marks(|m| {
            let live: HashSet<&String> = ids.iter().collect();
            m.marked.retain(|id| live.contains(id));
            m.total = ids.len();
        });
    }
}

/// Checkbox column; without a title its header is a select-all box
fn mark_column() -> Column<DataRow, TableHandle> {
    Column::new("")
        .width(MARK_WIDTH)
        .align(Align::Center)
        .render(|record: &DataRow, _, handle: &TableHandle| {
            let id = record.id();
            let checked = if id.is_empty() {
                handle.all_marked()
            } else {
                handle.is_marked(&id)
            };
            let (symbol, color) = if checked {
                ("[x]", Color::Green)
            } else {
                ("[ ]", Color::DarkGray)
            };
            Line::from(Span::styled(symbol, Style::default().fg(color)))
        })
}

/// Configured columns, or one per field of the first row
fn data_columns(config: &Config, rows: &[DataRow]) -> Vec<Column<DataRow, TableHandle>> {
    if !config.columns.is_empty() {
        return config.columns.iter().cloned().map(Column::from).collect();
    }

    let Some(first) = rows.first() else {
        return Vec::new();
    };

    // `id` first, the rest in key order
    let mut keys: Vec<&str> = first.keys().filter(|k| *k != "id").collect();
    if first.fields.contains_key("id") {
        keys.insert(0, "id");
    }
    keys.into_iter()
        .map(|key| Column::new(key).title(key))
        .collect()
}

fn row_ids(rows: &[DataRow]) -> Vec<String> {
    rows.iter().map(Record::id).collect()
}

pub struct App {
    pub should_quit: bool,
    table: TableView<DataRow, TableHandle>,
    handle: TableHandle,
    help: HelpDialog,
    show_help: bool,
    /// External loading flag, toggled by the user for demonstration
    loading: bool,
    /// Rows produced by the last refresh, picked up when it finishes
    pending_rows: Arc<Mutex<Option<Vec<DataRow>>>>,
    last_refreshed: Option<DateTime<Local>>,
    status_message: Option<String>,
}

impl App {
    pub fn new(config: &Config, rows: Vec<DataRow>) -> Self {
        let handle = TableHandle::default();
        handle.retain(&row_ids(&rows));

        let mut columns = vec![mark_column()];
        columns.extend(data_columns(config, &rows));

        let pending_rows: Arc<Mutex<Option<Vec<DataRow>>>> = Arc::default();
        let on_refresh: Option<RefreshCallback> = config.source.clone().map(|source| {
            let slot = pending_rows.clone();
            let callback: RefreshCallback = Arc::new(move || {
                let rows = source.load()?;
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(rows);
                Ok(())
            });
            callback
        });

        let mut table = TableView::new(handle.clone())
            .with_refresh_title(config.refresh_title.clone())
            .with_columns(columns)
            .with_rows(rows);
        table.set_title(config.title.clone());
        table.set_on_refresh(on_refresh);

        Self {
            should_quit: false,
            table,
            handle,
            help: HelpDialog::default(),
            show_help: false,
            loading: false,
            pending_rows,
            last_refreshed: Some(Local::now()),
            status_message: None,
        }
    }

    pub fn table(&self) -> &TableView<DataRow, TableHandle> {
        &self.table
    }

    fn finish_refresh(&mut self, success: bool) {
        if !success {
            self.status_message = Some("Refresh failed, see log".to_string());
            return;
        }

        let rows = self
            .pending_rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(rows) = rows {
            info!("refreshed {} rows", rows.len());
            self.handle.retain(&row_ids(&rows));
            self.table.set_rows(rows);
        }
        self.last_refreshed = Some(Local::now());
        self.status_message = None;
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} rows ", self.table.rows().len()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];

        let marked = self.handle.marked_count();
        if marked > 0 {
            spans.push(Span::styled(
                format!("│ {} marked ", marked),
                Style::default().fg(Color::Green),
            ));
        }

        if let Some(at) = self.last_refreshed {
            spans.push(Span::styled(
                format!("│ updated {} ", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
        }

        if self.loading {
            spans.push(Span::styled("│ loading ", Style::default().fg(Color::Yellow)));
        }

        if let Some(msg) = &self.status_message {
            spans.push(Span::styled(
                format!("│ {} ", msg),
                Style::default().fg(Color::Red),
            ));
        }

        spans.push(Span::styled(
            "│ ? help  q quit",
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.show_help {
            return self.help.handle_key_event(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Ok(Some(Action::Quit)),
            KeyCode::Char('?') => Ok(Some(Action::OpenHelp)),
            KeyCode::Char('L') => Ok(Some(Action::ToggleLoading)),
            _ => self.table.handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.show_help {
            return Ok(None);
        }
        self.table.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Ok(None)
            }
            Action::OpenHelp => {
                self.show_help = true;
                Ok(None)
            }
            Action::CloseModal => {
                self.show_help = false;
                Ok(None)
            }
            Action::ToggleLoading => {
                self.loading = !self.loading;
                self.table.set_loading(self.loading);
                Ok(None)
            }
            Action::ToggleMark(id) => {
                self.handle.toggle(&id);
                Ok(None)
            }
            Action::ToggleMarkAll => {
                self.handle.toggle_all(row_ids(self.table.rows()));
                Ok(None)
            }
            Action::RefreshFinished(success) => {
                if !success {
                    warn!("refresh did not complete");
                }
                self.finish_refresh(success);
                Ok(None)
            }
            other => self.table.update(other),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area);

        self.table.draw(frame, layout.table)?;
        frame.render_widget(
            Paragraph::new(self.status_line()).alignment(Alignment::Left),
            layout.status,
        );

        if self.show_help {
            self.help.draw(frame, area)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant};
    use table_view::services::DataSource;

    fn rows() -> Vec<DataRow> {
        vec![
            DataRow::new("1").with("id", "1").with("name", "ada"),
            DataRow::new("2").with("id", "2").with("name", "grace"),
        ]
    }

    fn run_until_refreshed(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.table().is_refreshing() {
            let mut action = Some(Action::Tick);
            while let Some(a) = action {
                action = app.update(a).unwrap();
            }
            assert!(Instant::now() < deadline, "refresh never finished");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_columns_derived_from_first_row() {
        let app = App::new(&Config::default(), rows());
        let indexes: Vec<&str> = app
            .table()
            .columns()
            .iter()
            .map(|c| c.data_index.as_str())
            .collect();
        assert_eq!(indexes, vec!["", "id", "name"]);
    }

    #[test]
    fn test_mark_header_reflects_select_all() {
        let mut app = App::new(&Config::default(), rows());
        let header = app.table().header_cells();
        assert_eq!(header[0].spans[0].content, "[ ]");

        app.update(Action::ToggleMarkAll).unwrap();
        let header = app.table().header_cells();
        assert_eq!(header[0].spans[0].content, "[x]");
        assert_eq!(app.handle.marked_count(), 2);

        app.update(Action::ToggleMarkAll).unwrap();
        assert_eq!(app.handle.marked_count(), 0);
    }

    #[test]
    fn test_toggle_mark_single_row() {
        let mut app = App::new(&Config::default(), rows());
        app.update(Action::ToggleMark("2".to_string())).unwrap();
        let table = app.table();
        let cells = table.row_cells(&table.rows()[1]);
        assert_eq!(cells[0].spans[0].content, "[x]");
        assert!(!app.handle.all_marked());
    }

    #[test]
    fn test_toggle_loading() {
        let mut app = App::new(&Config::default(), rows());
        app.update(Action::ToggleLoading).unwrap();
        assert!(app.table().is_refreshing());
        app.update(Action::ToggleLoading).unwrap();
        assert!(!app.table().is_refreshing());
    }

    #[test]
    fn test_refresh_reloads_source() {
        let dir = std::env::temp_dir().join(format!("table-view-app-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rows.csv");
        std::fs::write(&path, "id,name\n1,ada\n").unwrap();

        let config = Config {
            source: Some(DataSource::File { path: path.clone() }),
            ..Config::default()
        };
        let mut app = App::new(&config, config.source.as_ref().unwrap().load().unwrap());
        app.update(Action::ToggleMark("1".to_string())).unwrap();

        std::fs::write(&path, "id,name\n2,grace\n3,linus\n").unwrap();
        app.update(Action::PullRefresh).unwrap();
        run_until_refreshed(&mut app);

        assert_eq!(app.table().rows().len(), 2);
        assert_eq!(app.handle.marked_count(), 0);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_rows() {
        let config = Config {
            source: Some(DataSource::File {
                path: PathBuf::from("/nonexistent/table-view/rows.csv"),
            }),
            ..Config::default()
        };
        let mut app = App::new(&config, rows());
        app.update(Action::PullRefresh).unwrap();
        run_until_refreshed(&mut app);

        assert_eq!(app.table().rows().len(), 2);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_help_captures_keys() {
        let mut app = App::new(&Config::default(), rows());
        app.update(Action::OpenHelp).unwrap();
        let action = app
            .handle_key_event(KeyEvent::from(KeyCode::Char('q')))
            .unwrap();
        assert_eq!(action, Some(Action::CloseModal));
        app.update(Action::CloseModal).unwrap();
        assert!(!app.should_quit);
    }
}
