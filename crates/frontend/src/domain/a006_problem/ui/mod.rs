pub mod entity;
pub mod list;
