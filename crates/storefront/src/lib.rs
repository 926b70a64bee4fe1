pub mod action;
pub mod app;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod errors;
pub mod pages;
pub mod services;
pub mod tui;
