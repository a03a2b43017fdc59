pub mod notifier;
pub mod repository;
pub mod rules;
pub mod service;
pub mod worker;
