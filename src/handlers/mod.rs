pub mod api;
pub mod items;
