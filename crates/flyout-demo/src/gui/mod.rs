pub mod app;
pub mod layer;
pub mod theme;
