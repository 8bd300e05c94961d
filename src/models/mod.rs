pub mod page;
pub mod profile;
pub mod setting;
