pub mod edit;
pub mod engine;
pub mod field;
pub mod posted;
pub mod render;
pub mod validate;
