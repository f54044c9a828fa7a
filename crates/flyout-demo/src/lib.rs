pub mod config;
pub mod gui;
pub mod menus;
