use super::MenuKind;
use crate::config::DemoConfig;
use crate::gui::app::AppMsg;
use flyout::color::fade;
use flyout::{
    ArgbColor, ArrayAdapter, ButtonRenderer, FlyoutMenuView, GridLayout, ItemId, MenuItem, Rect,
    Surface, SurfaceError, listener_fn,
};
use relm4::Sender;
use std::cell::RefCell;
use std::rc::Rc;

const COLUMNS: u32 = 4;
/// Glyph size as a fraction of the smaller side of its bounds.
const GLYPH_SCALE: f64 = 0.6;

fn faces() -> impl Iterator<Item = String> {
    (0x1F600..=0x1F60F)
        .filter_map(char::from_u32)
        .map(String::from)
}

fn draw_glyph(
    surface: &mut dyn Surface,
    bounds: Rect,
    glyph: &str,
    alpha: f64,
) -> Result<(), SurfaceError> {
    let size = bounds.width().min(bounds.height()) * GLYPH_SCALE;
    surface.fill_text(
        glyph,
        bounds.center(),
        size,
        fade(ArgbColor::BLACK.to_srgba(), alpha),
    )
}

struct EmojiItem {
    id: ItemId,
    glyph: String,
}

impl MenuItem for EmojiItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn draw(&self, surface: &mut dyn Surface, bounds: Rect, _: f64) -> Result<(), SurfaceError> {
        draw_glyph(surface, bounds, &self.glyph, 1.0)
    }
}

struct EmojiButton {
    glyph: RefCell<String>,
}

impl ButtonRenderer for EmojiButton {
    fn draw_content(
        &self,
        surface: &mut dyn Surface,
        bounds: Rect,
        _: ArgbColor,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        draw_glyph(surface, bounds, &self.glyph.borrow(), alpha)
    }
}

pub fn build(config: &DemoConfig, sender: Sender<AppMsg>) -> anyhow::Result<FlyoutMenuView> {
    let mut view = FlyoutMenuView::new(&config.emoji)?;

    let adapter = Rc::new(ArrayAdapter::new(faces().enumerate().map(|(i, glyph)| {
        EmojiItem {
            id: ItemId::new(i as i32),
            glyph,
        }
    })));
    let button = Rc::new(EmojiButton {
        glyph: RefCell::default(),
    });

    view.set_layout(Some(Rc::new(GridLayout::new(COLUMNS, GridLayout::UNSPECIFIED)?)));
    view.set_adapter(Some(adapter.clone()));
    view.set_button_renderer(Some(button.clone()));

    let dismissed = sender.clone();
    view.set_selection_listener(Some(listener_fn(
        move |item| {
            if let Some(selected) = adapter.find(item.id()) {
                *button.glyph.borrow_mut() = selected.glyph.clone();
                sender.emit(AppMsg::Status(format!("Emoji: {}", selected.glyph)));
            }
        },
        move || dismissed.emit(AppMsg::Dismissed(MenuKind::Emoji)),
    )));
    view.set_selected_by_position(0);
    Ok(view)
}
