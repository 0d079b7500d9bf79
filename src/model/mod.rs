pub mod catalog;
pub mod config;
pub mod document;
pub mod language;
