//! Main module for archieml library functionality

pub mod buffer;
pub mod building;
pub mod commands;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod formats;
pub mod loader;
pub mod parser;
pub mod testing;
