//! Desktop dashboard for diagnostic assessment workbooks: loads an Excel
//! sheet, filters it interactively, and charts group means.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod schema;
pub mod state;
pub mod ui;
