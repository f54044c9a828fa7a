pub mod emoji;
pub mod icon;
pub mod palette;
pub mod tool;

use crate::config::DemoConfig;
use crate::gui::app::AppMsg;
use flyout::{FlyoutMenuView, MenuConfig};
use relm4::Sender;
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MenuKind {
    Tool,
    Palette,
    Emoji,
    Icon,
}

impl MenuKind {
    pub fn config(self, config: &DemoConfig) -> &MenuConfig {
        match self {
            MenuKind::Tool => &config.tool,
            MenuKind::Palette => &config.palette,
            MenuKind::Emoji => &config.emoji,
            MenuKind::Icon => &config.icon,
        }
    }

    pub fn build(self, config: &DemoConfig, sender: Sender<AppMsg>) -> anyhow::Result<FlyoutMenuView> {
        match self {
            MenuKind::Tool => tool::build(config, sender),
            MenuKind::Palette => palette::build(config, sender),
            MenuKind::Emoji => emoji::build(config, sender),
            MenuKind::Icon => icon::build(config, sender),
        }
    }
}
