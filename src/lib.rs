//! table-view - A scrollable, refreshable data table for ratatui
//!
//! The crate is built around [`components::TableView`]: columns with
//! optional custom renderers, horizontal scrolling when the columns are
//! wider than the viewport, and pull-to-refresh bound to a callback that
//! runs in the background. It follows the Component Architecture pattern:
//! events become [`action::Action`]s, `update` applies them, `draw` renders.

pub mod action;
pub mod component;
pub mod components;
pub mod config;
pub mod model;
pub mod services;
pub mod tui;
