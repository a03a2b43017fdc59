pub mod api_utils;
pub mod format;
pub mod icons;
pub mod indicators;
pub mod page_frame;
pub mod pagination;
pub mod project_scope;
