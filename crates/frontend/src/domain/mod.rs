pub mod a001_project;
pub mod a002_phase;
pub mod a003_operation;
pub mod a004_threshold;
pub mod a005_report;
pub mod a006_problem;
pub mod a007_solution;
pub mod a008_team_member;
pub mod a009_alert;
pub mod a010_history;
