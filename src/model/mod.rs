//! Model layer
//!
//! - `column` - Column descriptors and their config-file form
//! - `record` - The `Record` trait and a JSON-backed `DataRow`
//! - `refresh` - The refreshing flag and its reconciliation with `loading`

pub mod column;
pub mod record;
pub mod refresh;

pub use column::{content_width, Align, CellRenderer, Column, ColumnConfig, DEFAULT_COLUMN_WIDTH};
pub use record::{cell_text, dedupe_ids, DataRow, Record};
pub use refresh::{RefreshControl, RefreshState, DEFAULT_REFRESH_TITLE};
