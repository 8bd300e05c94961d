//! Custom pages, menus and forms for a learning-management site.

pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod files;
pub mod forms;
pub mod handlers;
pub mod lang;
pub mod mail;
pub mod menu;
pub mod models;
pub mod store;
pub mod submission;
pub mod templates_structs;
pub mod text;
pub mod view;
