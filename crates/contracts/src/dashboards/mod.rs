pub mod d400_general;
pub mod d401_project;
