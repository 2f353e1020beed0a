pub mod definition;
pub mod definition_client;
pub mod page;
pub mod popup;
pub mod render;
