pub mod choose;
pub mod details;
