use super::MenuKind;
use crate::config::DemoConfig;
use crate::gui::app::AppMsg;
use flyout::color::fade;
use flyout::{
    ArgbColor, ArrayAdapter, ButtonRenderer, FlyoutMenuView, GridLayout, ItemId, MenuItem, Rect,
    Surface, SurfaceError, listener_fn,
};
use relm4::Sender;
use std::cell::Cell;
use std::rc::Rc;

const ROWS: u32 = 8;
const COLUMNS: u32 = 8;
const CORNER_RADIUS: f64 = 4.0;
const BUTTON_INSET: f64 = 8.0;
const LIGHT_LUMINANCE: f64 = 0.7;
const OUTLINE: ArgbColor = ArgbColor::new(0x3300_0000);

/// One hue per row. The first column runs from black to white, the rest
/// step the hue's lightness up at full saturation.
fn swatch(row: u32, column: u32) -> ArgbColor {
    let hue = 360.0 * row as f64 / ROWS as f64;
    if column == 0 {
        ArgbColor::from_hsl(hue, 0.0, row as f64 / (ROWS - 1) as f64)
    } else {
        ArgbColor::from_hsl(hue, 1.0, column as f64 / COLUMNS as f64)
    }
}

struct PaletteItem {
    id: ItemId,
    color: ArgbColor,
    corner_radius: f64,
}

impl MenuItem for PaletteItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn draw(&self, surface: &mut dyn Surface, bounds: Rect, _: f64) -> Result<(), SurfaceError> {
        if self.corner_radius > 0.0 {
            surface.fill_round_rect(bounds, self.corner_radius, self.color.to_srgba())
        } else {
            surface.fill_rect(bounds, self.color.to_srgba())
        }
    }
}

struct PaletteButton {
    color: Cell<ArgbColor>,
}

impl ButtonRenderer for PaletteButton {
    fn draw_content(
        &self,
        surface: &mut dyn Surface,
        bounds: Rect,
        _: ArgbColor,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        let color = self.color.get();
        let swatch = bounds.inset(BUTTON_INSET, BUTTON_INSET);
        surface.fill_oval(swatch, fade(color.to_srgba(), alpha))?;
        if color.luminance() > LIGHT_LUMINANCE {
            surface.stroke_oval(swatch, 1.0, fade(OUTLINE.to_srgba(), alpha))?;
        }
        Ok(())
    }
}

pub fn build(config: &DemoConfig, sender: Sender<AppMsg>) -> anyhow::Result<FlyoutMenuView> {
    let mut view = FlyoutMenuView::new(&config.palette)?;
    let corner_radius = if config.palette.item_margin > 0.0 {
        CORNER_RADIUS
    } else {
        0.0
    };

    let cells = (0..ROWS).flat_map(|row| (0..COLUMNS).map(move |column| (row, column)));
    let adapter = Rc::new(ArrayAdapter::new(cells.map(|(row, column)| PaletteItem {
        id: ItemId::new((row * COLUMNS + column) as i32),
        color: swatch(row, column),
        corner_radius,
    })));
    let button = Rc::new(PaletteButton {
        color: Cell::new(ArgbColor::BLACK),
    });

    view.set_layout(Some(Rc::new(GridLayout::new(COLUMNS, GridLayout::UNSPECIFIED)?)));
    view.set_adapter(Some(adapter.clone()));
    view.set_button_renderer(Some(button.clone()));

    let dismissed = sender.clone();
    view.set_selection_listener(Some(listener_fn(
        move |item| {
            if let Some(selected) = adapter.find(item.id()) {
                button.color.set(selected.color);
                sender.emit(AppMsg::Status(format!(
                    "Color: #{:06X}",
                    selected.color.argb() & 0x00FF_FFFF
                )));
            }
        },
        move || dismissed.emit(AppMsg::Dismissed(MenuKind::Palette)),
    )));
    view.set_selected_by_position(0);
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyout::surface::recording::{DrawOp, RecordingSurface};

    #[test]
    fn test_grayscale_column() {
        assert_eq!(swatch(0, 0), ArgbColor::BLACK);
        assert_eq!(swatch(ROWS - 1, 0), ArgbColor::WHITE);
    }

    #[test]
    fn test_hue_rows() {
        assert_eq!(swatch(0, 4), ArgbColor::new(0xFFFF_0000));
        // Row 4 sits half way round the wheel.
        assert_eq!(swatch(4, 4), ArgbColor::new(0xFF00_FFFF));
    }

    #[test]
    fn test_light_button_gets_outline() {
        let button = PaletteButton {
            color: Cell::new(ArgbColor::WHITE),
        };
        let mut surface = RecordingSurface::default();
        button
            .draw_content(&mut surface, Rect::new(0.0, 0.0, 56.0, 56.0), ArgbColor::WHITE, 1.0)
            .unwrap();

        assert!(matches!(
            surface.ops(),
            [DrawOp::FillOval { .. }, DrawOp::StrokeOval { .. }]
        ));

        button.color.set(ArgbColor::BLACK);
        surface.clear();
        button
            .draw_content(&mut surface, Rect::new(0.0, 0.0, 56.0, 56.0), ArgbColor::WHITE, 1.0)
            .unwrap();
        match surface.ops() {
            [DrawOp::FillOval { bounds, .. }] => {
                assert_eq!(*bounds, Rect::new(8.0, 8.0, 48.0, 48.0));
            }
            ops => panic!("unexpected ops: {ops:?}"),
        }
    }

    #[test]
    fn test_build_with_defaults() {
        let (sender, _receiver) = relm4::channel();
        let view = build(&DemoConfig::default(), sender).unwrap();

        assert_eq!(view.adapter().map(|a| a.count()), Some((ROWS * COLUMNS) as usize));
        assert_eq!(view.selected_item_id(), Some(ItemId::new(0)));
        let size = view.measure(
            flyout::MeasureSpec::Unspecified,
            flyout::MeasureSpec::Unspecified,
        );
        assert!(size.width > 0.0 && size.height > 0.0);
    }
}
