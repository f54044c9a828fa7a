use super::MenuKind;
use crate::config::DemoConfig;
use crate::gui::app::AppMsg;
use flyout::color::fade;
use flyout::surface::with_saved_state;
use flyout::{
    ArgbColor, ArrayAdapter, ButtonRenderer, FlyoutMenuView, GridLayout, ItemId, MenuItem, Rect,
    Surface, SurfaceError, listener_fn,
};
use relm4::Sender;
use std::cell::Cell;
use std::rc::Rc;

const SIZES: u32 = 6;
const BUTTON_INSET: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tool {
    /// Fraction of the drawing bounds covered by the tool's disc.
    pub size: f64,
    pub eraser: bool,
}

#[derive(Debug)]
struct ToolStyle {
    fill: ArgbColor,
    checker: ArgbColor,
    checker_size: f64,
}

fn draw_tool(
    surface: &mut dyn Surface,
    bounds: Rect,
    tool: Tool,
    style: &ToolStyle,
    alpha: f64,
) -> Result<(), SurfaceError> {
    let radius = tool.size.clamp(0.0, 1.0) * bounds.width().min(bounds.height()) / 2.0;
    let disc = Rect::around(bounds.center(), radius);

    if !tool.eraser {
        return surface.fill_oval(disc, fade(style.fill.to_srgba(), alpha));
    }

    let checker = fade(style.checker.to_srgba(), alpha);
    with_saved_state(surface, |s| {
        s.clip_oval(disc);
        s.fill_rect(disc, fade(ArgbColor::WHITE.to_srgba(), alpha))?;
        let step = style.checker_size;
        let columns = (disc.width() / step).ceil() as usize;
        let rows = (disc.height() / step).ceil() as usize;
        for row in 0..rows {
            for column in (row % 2..columns).step_by(2) {
                let left = disc.left + column as f64 * step;
                let top = disc.top + row as f64 * step;
                s.fill_rect(Rect::new(left, top, left + step, top + step), checker)?;
            }
        }
        Ok(())
    })?;
    surface.stroke_oval(disc, 1.0, checker)
}

struct ToolItem {
    id: ItemId,
    tool: Tool,
    style: Rc<ToolStyle>,
}

impl MenuItem for ToolItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn draw(&self, surface: &mut dyn Surface, bounds: Rect, _: f64) -> Result<(), SurfaceError> {
        draw_tool(surface, bounds, self.tool, &self.style, 1.0)
    }
}

struct ToolButton {
    tool: Cell<Tool>,
    style: Rc<ToolStyle>,
}

impl ButtonRenderer for ToolButton {
    fn draw_content(
        &self,
        surface: &mut dyn Surface,
        bounds: Rect,
        _: ArgbColor,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        let inner = bounds.inset(BUTTON_INSET, BUTTON_INSET);
        draw_tool(surface, inner, self.tool.get(), &self.style, alpha)
    }
}

fn describe(tool: Tool, fill: ArgbColor) -> String {
    if tool.eraser {
        format!("Eraser size: {:.2}", tool.size)
    } else {
        format!(
            "Brush size: {:.2} color: #{:06X}",
            tool.size,
            fill.argb() & 0x00FF_FFFF
        )
    }
}

/// Brush sizes on the first row, eraser sizes on the second.
fn tools() -> impl Iterator<Item = Tool> {
    [false, true].into_iter().flat_map(|eraser| {
        (1..=SIZES).map(move |i| Tool {
            size: i as f64 / SIZES as f64,
            eraser,
        })
    })
}

pub fn build(config: &DemoConfig, sender: Sender<AppMsg>) -> anyhow::Result<FlyoutMenuView> {
    let mut view = FlyoutMenuView::new(&config.tool)?;
    let style = Rc::new(ToolStyle {
        fill: config.tool_fill_color,
        checker: config.alpha_checker_color,
        checker_size: config.alpha_checker_size,
    });

    let adapter = Rc::new(ArrayAdapter::new(tools().enumerate().map(|(i, tool)| {
        ToolItem {
            id: ItemId::new(i as i32),
            tool,
            style: Rc::clone(&style),
        }
    })));
    let button = Rc::new(ToolButton {
        tool: Cell::new(Tool {
            size: 1.0,
            eraser: false,
        }),
        style: Rc::clone(&style),
    });

    view.set_layout(Some(Rc::new(GridLayout::new(SIZES, GridLayout::UNSPECIFIED)?)));
    view.set_adapter(Some(adapter.clone()));
    view.set_button_renderer(Some(button.clone()));

    let fill = style.fill;
    let dismissed = sender.clone();
    view.set_selection_listener(Some(listener_fn(
        move |item| {
            if let Some(selected) = adapter.find(item.id()) {
                button.tool.set(selected.tool);
                sender.emit(AppMsg::Status(describe(selected.tool, fill)));
            }
        },
        move || dismissed.emit(AppMsg::Dismissed(MenuKind::Tool)),
    )));
    view.set_selected_by_position(SIZES as usize - 1);
    Ok(view)
}
