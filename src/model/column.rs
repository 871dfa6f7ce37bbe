//! Column descriptors
//!
//! A column binds a record field to a slot in the table and optionally
//! overrides how its cells (and its header) are drawn.

use ratatui::layout::Alignment;
use ratatui::text::Line;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Width used for columns that don't specify one
pub const DEFAULT_COLUMN_WIDTH: u16 = 40;

/// Custom cell renderer: `(record, column index, instance handle)`
pub type CellRenderer<T, H> = Arc<dyn Fn(&T, usize, &H) -> Line<'static> + Send + Sync>;

/// Horizontal alignment of cell content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

/// One table column
pub struct Column<T, H> {
    pub data_index: String,
    pub title: Option<String>,
    pub width: Option<u16>,
    pub align: Align,
    pub render: Option<CellRenderer<T, H>>,
}

impl<T, H> Column<T, H> {
    pub fn new(data_index: impl Into<String>) -> Self {
        Self {
            data_index: data_index.into(),
            title: None,
            width: None,
            align: Align::default(),
            render: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T, usize, &H) -> Line<'static> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Width in cells, falling back to [`DEFAULT_COLUMN_WIDTH`]
    pub fn effective_width(&self) -> u16 {
        self.width.unwrap_or(DEFAULT_COLUMN_WIDTH)
    }
}

// Manual impls: deriving would require `T: Clone` / `H: Clone`.
impl<T, H> Clone for Column<T, H> {
    fn clone(&self) -> Self {
        Self {
            data_index: self.data_index.clone(),
            title: self.title.clone(),
            width: self.width,
            align: self.align,
            render: self.render.clone(),
        }
    }
}

impl<T, H> fmt::Debug for Column<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("data_index", &self.data_index)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Total width of a column set, missing widths counted as the default
pub fn content_width<T, H>(columns: &[Column<T, H>]) -> u16 {
    columns
        .iter()
        .fold(0u16, |acc, col| acc.saturating_add(col.effective_width()))
}

/// Column description as it appears in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub data_index: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(default)]
    pub align: Align,
}

impl<T, H> From<ColumnConfig> for Column<T, H> {
    fn from(config: ColumnConfig) -> Self {
        Column {
            data_index: config.data_index,
            title: config.title,
            width: config.width,
            align: config.align,
            render: None,
        }
    }
}
