pub mod aggregate;
pub mod app;
pub mod archive;
pub mod config;
pub mod domain;
pub mod download;
pub mod error;
pub mod fs_util;
pub mod loader;
pub mod output;
pub mod parser;
pub mod table;
pub mod workbook;
