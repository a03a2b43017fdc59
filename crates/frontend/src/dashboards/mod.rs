pub mod d400_general;

pub use d400_general::ui::DashboardPage;
