use crate::config::DemoConfig;
use crate::gui::layer::LayerHost;
use crate::gui::theme::{self, ThemeColors};
use crate::menus::MenuKind;
use flyout::{
    ArgbColor, FlyoutMenuView, MeasureSpec, Point, PointerAction, PointerEvent, Rect, Size,
};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use strum::IntoEnumIterator;

struct DemoMenu {
    kind: MenuKind,
    view: FlyoutMenuView,
    button: gtk::DrawingArea,
}

type Menus = Rc<RefCell<Vec<DemoMenu>>>;

pub struct AppModel {
    status: String,
    menus: Menus,
}

#[derive(Debug)]
pub enum AppMsg {
    Status(String),
    Dismissed(MenuKind),
    DismissAll,
}

/// Stage cell for each trigger button, placed so every menu has room to
/// open in its configured direction.
fn stage_cell(kind: MenuKind) -> (i32, i32) {
    match kind {
        MenuKind::Tool => (0, 1),
        MenuKind::Palette => (1, 0),
        MenuKind::Emoji => (1, 2),
        MenuKind::Icon => (1, 1),
    }
}

fn sync_geometry(menu: &mut DemoMenu, overlay: &gtk::Overlay) {
    if let Some(bounds) = menu.button.compute_bounds(overlay) {
        menu.view.set_frame(Rect::new(
            bounds.x() as f64,
            bounds.y() as f64,
            (bounds.x() + bounds.width()) as f64,
            (bounds.y() + bounds.height()) as f64,
        ));
    }
    menu.view
        .set_screen_size(Size::new(overlay.width() as f64, overlay.height() as f64));
}

fn route_button_pointer(
    menus: &Menus,
    index: usize,
    overlay: &gtk::Overlay,
    action: PointerAction,
    x: f64,
    y: f64,
) {
    let mut menus = menus.borrow_mut();
    let Some(menu) = menus.get_mut(index) else {
        return;
    };
    sync_geometry(menu, overlay);
    menu.view
        .handle_button_pointer(PointerEvent::new(action, Point::new(x, y)));
    menu.button.queue_draw();
}

fn connect_button(menus: &Menus, index: usize, button: &gtk::DrawingArea, overlay: &gtk::Overlay) {
    let drag = gtk::GestureDrag::new();

    let (m, o) = (menus.clone(), overlay.clone());
    drag.connect_drag_begin(move |_, x, y| {
        route_button_pointer(&m, index, &o, PointerAction::Down, x, y);
    });

    let (m, o) = (menus.clone(), overlay.clone());
    drag.connect_drag_update(move |gesture, dx, dy| {
        if let Some((x, y)) = gesture.start_point() {
            route_button_pointer(&m, index, &o, PointerAction::Move, x + dx, y + dy);
        }
    });

    let (m, o) = (menus.clone(), overlay.clone());
    drag.connect_drag_end(move |gesture, dx, dy| {
        if let Some((x, y)) = gesture.start_point() {
            route_button_pointer(&m, index, &o, PointerAction::Up, x + dx, y + dy);
        }
    });

    button.add_controller(drag);

    let m = menus.clone();
    button.set_draw_func(move |_, cr, _, _| {
        let mut menus = m.borrow_mut();
        if let Some(menu) = menus.get_mut(index) {
            let mut cr = cr.clone();
            if let Err(e) = menu.view.draw_button(&mut cr) {
                log::error!("Drawing error: {}", e);
            }
        }
    });
}

/// Taps on the shared layer go to whichever menu was left open as a dialog.
fn connect_layer(menus: &Menus, layer: &LayerHost, overlay: &gtk::Overlay) {
    let click = gtk::GestureClick::new();
    let route = |menus: Menus, action: PointerAction| {
        move |_: &gtk::GestureClick, _: i32, x: f64, y: f64| {
            let event = PointerEvent::new(action, Point::new(x, y));
            for menu in menus.borrow_mut().iter_mut() {
                if menu.view.handle_overlay_pointer(event) {
                    menu.button.queue_draw();
                    break;
                }
            }
        }
    };
    click.connect_pressed(route(menus.clone(), PointerAction::Down));
    click.connect_released(route(menus.clone(), PointerAction::Up));
    layer.area().add_controller(click);

    let (m, o) = (menus.clone(), overlay.clone());
    layer.area().set_draw_func(move |_, cr, _, _| {
        let mut cr = cr.clone();
        for menu in m.borrow_mut().iter_mut() {
            sync_geometry(menu, &o);
            if let Err(e) = menu.view.draw_overlay(&mut cr) {
                log::error!("Drawing error: {}", e);
            }
        }
    });
}

fn start_ticking(menus: &Menus, root: &gtk::ApplicationWindow, layer: &LayerHost) {
    let menus = menus.clone();
    let area = layer.area().clone();
    root.add_tick_callback(move |_, _| {
        let mut animating = false;
        for menu in menus.borrow_mut().iter_mut() {
            if menu.view.is_animating() {
                menu.view.tick();
                menu.button.queue_draw();
                animating = true;
            }
        }
        if animating {
            area.queue_draw();
        }
        glib::ControlFlow::Continue
    });
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = DemoConfig;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Flyout menus"),
            set_default_width: 720,
            set_default_height: 540,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::DismissAll);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,

                    #[name = "stage"]
                    gtk::Grid {
                        set_hexpand: true,
                        set_vexpand: true,
                        set_row_homogeneous: true,
                        set_column_homogeneous: true,
                    },

                    gtk::Label {
                        add_css_class: "flyout-status",
                        #[watch]
                        set_label: &model.status,
                    },
                },
            }
        }
    }

    fn init(
        config: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        theme::load_css();

        let model = AppModel {
            status: "Press a button and drag onto an item".to_string(),
            menus: Rc::default(),
        };

        let widgets = view_output!();

        let layer = LayerHost::new(
            gtk::DrawingArea::builder()
                .hexpand(true)
                .vexpand(true)
                .build(),
        );
        layer.area().add_css_class("flyout-layer");
        widgets.overlay.add_overlay(layer.area());

        let colors = ThemeColors::from_context(&root.style_context());

        for kind in MenuKind::iter() {
            let mut view = match kind.build(&config, sender.input_sender().clone()) {
                Ok(view) => view,
                Err(e) => {
                    log::error!("Failed to build {} menu: {:#}", kind, e);
                    continue;
                }
            };
            if kind.config(&config).selected_item_background_color == ArgbColor::TRANSPARENT {
                view.set_selected_item_background_color(colors.selected_argb());
            }
            view.set_overlay_host(Some(Box::new(layer.clone())));

            let size = view.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
            let button = gtk::DrawingArea::builder()
                .content_width(size.width.ceil() as i32)
                .content_height(size.height.ceil() as i32)
                .halign(gtk::Align::Center)
                .valign(gtk::Align::Center)
                .tooltip_text(kind.to_string())
                .build();
            button.add_css_class("flyout-button");
            let (column, row) = stage_cell(kind);
            widgets.stage.attach(&button, column, row, 1, 1);

            let index = {
                let mut menus = model.menus.borrow_mut();
                menus.push(DemoMenu {
                    kind,
                    view,
                    button: button.clone(),
                });
                menus.len() - 1
            };
            connect_button(&model.menus, index, &button, &widgets.overlay);
            log::debug!("{} menu ready", kind);
        }

        connect_layer(&model.menus, &layer, &widgets.overlay);
        start_ticking(&model.menus, &root, &layer);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Status(status) => self.status = status,
            AppMsg::Dismissed(kind) => {
                self.status = format!("{} menu dismissed", kind);
            }
            AppMsg::DismissAll => {
                for menu in self.menus.borrow_mut().iter_mut() {
                    if menu.view.dismiss() {
                        log::debug!("{} menu dismissed from keyboard", menu.kind);
                    }
                }
            }
        }
    }
}
