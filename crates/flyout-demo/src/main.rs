use flyout_demo::config;
use flyout_demo::gui::app::AppModel;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();

    let app = RelmApp::new("org.troia.flyout");

    app.run::<AppModel>(config);
}
