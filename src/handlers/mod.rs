pub mod admin_handlers;
pub mod file_handlers;
pub mod page_handlers;
pub mod settings_handlers;
