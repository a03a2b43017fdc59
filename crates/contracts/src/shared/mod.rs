pub mod status_color;
