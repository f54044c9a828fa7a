//! The transient full-screen surface: shield, revealed panel and items.

use super::Settings;
use crate::color::fade;
use crate::geometry::{Point, Rect, Size, clamp_to_usable_screen, covering_radius, lerp, menu_origin};
use crate::item::{Adapter, MenuItem};
use crate::layout::Layout;
use crate::shadow::ShadowImage;
use crate::surface::{Surface, SurfaceError, with_saved_state};
use std::rc::{Rc, Weak};

/// Open fraction below which the panel is not drawn at all.
const MENU_PINION: f64 = 0.15;
/// Reveal fraction after which the panel shadow starts to fade in.
const SHADOW_PINION: f64 = 0.5;

/// Where the trigger button sits, in overlay coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ButtonAnchor {
    pub center: Point,
    pub radius: f64,
}

/// Inputs needed to place the panel.
pub(crate) struct Placement<'a> {
    pub adapter: Option<&'a dyn Adapter>,
    pub layout: Option<&'a dyn Layout>,
    pub settings: &'a Settings,
    pub button: ButtonAnchor,
    pub screen: Option<Size>,
}

/// Per-frame animation state.
pub(crate) struct Frame<'a> {
    pub settings: &'a Settings,
    pub button: ButtonAnchor,
    pub screen: Option<Size>,
    pub open_transition: f64,
    pub selection_transition: f64,
    pub selected: Option<&'a Weak<dyn MenuItem>>,
    pub previously_selected: Option<&'a Weak<dyn MenuItem>>,
}

struct MenuFill {
    panel: Rect,
    covering_radius: f64,
}

struct MenuItemLayout {
    item: Rc<dyn MenuItem>,
    /// Cell relative to the panel's top-left corner.
    frame: Rect,
    /// Drawing bounds relative to the cell.
    bounds: Rect,
}

#[derive(Default)]
pub(crate) struct MenuOverlay {
    fill: Option<MenuFill>,
    items: Option<Vec<MenuItemLayout>>,
    shadow: Option<ShadowImage>,
}

impl MenuOverlay {
    /// Panel position or covering radius is stale.
    pub fn invalidate_fill(&mut self) {
        self.fill = None;
    }

    /// Item cells are stale. The panel depends on them, so it is too.
    pub fn invalidate_items(&mut self) {
        self.items = None;
        self.fill = None;
    }

    pub fn invalidate_shadow(&mut self) {
        self.shadow = None;
    }

    pub fn panel(&self) -> Option<Rect> {
        self.fill.as_ref().map(|fill| fill.panel)
    }

    /// Recomputes whatever was invalidated. Does nothing without both an
    /// adapter and a layout.
    pub fn prepare(&mut self, placement: &Placement<'_>) {
        let (Some(adapter), Some(layout)) = (placement.adapter, placement.layout) else {
            return;
        };
        let metrics = placement.settings.item_metrics;

        if self.items.is_none() {
            let bounds = Rect::new(0.0, 0.0, metrics.width, metrics.height);
            let items: Vec<MenuItemLayout> = (0..adapter.count())
                .filter_map(|position| {
                    let item = adapter.item_at(position)?;
                    Some(MenuItemLayout {
                        item,
                        frame: layout.rect_for_item(position, metrics),
                        bounds,
                    })
                })
                .collect();
            log::trace!("laid out {} menu items", items.len());
            self.items = Some(items);
            self.fill = None;
        }

        if self.fill.is_none() {
            let settings = placement.settings;
            let size = layout.minimum_size(adapter.count(), metrics);
            let origin = menu_origin(
                placement.button.center,
                placement.button.radius,
                size,
                settings.anchor,
                settings.menu_margin,
            );
            let mut panel = Rect::from_origin_size(origin, size);
            if let Some(screen) = placement.screen {
                panel = clamp_to_usable_screen(panel, screen, settings.menu_margin);
            }
            let covering_radius = covering_radius(panel, placement.button.center);
            log::trace!("menu panel {panel:?}, reveal radius {covering_radius:.1}");
            self.fill = Some(MenuFill {
                panel,
                covering_radius,
            });
        }
    }

    /// Item whose cell contains `point`, given in overlay coordinates.
    pub fn item_at(&self, point: Point) -> Option<Rc<dyn MenuItem>> {
        let panel = self.fill.as_ref()?.panel;
        let local = Point::new(point.x - panel.left, point.y - panel.top);
        self.items
            .as_ref()?
            .iter()
            .find(|layout| layout.frame.contains(local))
            .map(|layout| Rc::clone(&layout.item))
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, frame: &Frame<'_>) -> Result<(), SurfaceError> {
        let settings = frame.settings;
        let shield = settings.shield_color;
        if settings.shield_visible && shield.alpha() > 0 {
            if let Some(screen) = frame.screen {
                let bounds = Rect::from_origin_size(Point::default(), screen);
                surface.fill_rect(bounds, fade(shield.to_srgba(), frame.open_transition))?;
            }
        }

        if frame.open_transition >= MENU_PINION {
            let reveal = (frame.open_transition - MENU_PINION) / (1.0 - MENU_PINION);
            self.draw_menu(surface, frame, reveal)?;
        }
        Ok(())
    }

    fn draw_menu(
        &mut self,
        surface: &mut dyn Surface,
        frame: &Frame<'_>,
        reveal: f64,
    ) -> Result<(), SurfaceError> {
        let Some(fill) = self.fill.as_ref() else {
            return Ok(());
        };
        let settings = frame.settings;

        if settings.menu_elevation > 0.0 && reveal > SHADOW_PINION {
            if self.shadow.is_none() {
                self.shadow = ShadowImage::for_menu(settings.menu_elevation);
            }
            if let Some(shadow) = &self.shadow {
                let t = (reveal - SHADOW_PINION) / (1.0 - SHADOW_PINION);
                shadow.draw_around(surface, fill.panel, t * t)?;
            }
        }

        let items = self.items.as_deref().unwrap_or_default();
        with_saved_state(surface, |surface| {
            surface.clip_round_rect(fill.panel, settings.corner_radius);
            let radius = lerp(frame.button.radius, fill.covering_radius, reveal);
            surface.clip_oval(Rect::around(frame.button.center, radius));

            surface.fill_rect(fill.panel, settings.menu_background_color.to_srgba())?;

            for layout in items {
                let degree = selection_degree(&layout.item, frame);
                with_saved_state(surface, |surface| {
                    surface.translate(
                        fill.panel.left + layout.frame.left,
                        fill.panel.top + layout.frame.top,
                    );
                    let highlight = settings.selected_item_background_color;
                    if degree > 0.0 && highlight.alpha() > 0 {
                        let half = settings.item_metrics.margin / 2.0;
                        surface.fill_round_rect(
                            layout.bounds.inset(-half, -half),
                            settings.corner_radius,
                            fade(highlight.to_srgba(), degree),
                        )?;
                    }
                    layout.item.draw(surface, layout.bounds, degree)
                })?;
            }
            Ok(())
        })
    }
}

fn is_item(item: &Rc<dyn MenuItem>, other: Option<&Weak<dyn MenuItem>>) -> bool {
    other.is_some_and(|other| std::ptr::addr_eq(Rc::as_ptr(item), other.as_ptr()))
}

/// 1 for the selected item, 0 for the rest, in between while the selection
/// animates from the previous item to the new one.
fn selection_degree(item: &Rc<dyn MenuItem>, frame: &Frame<'_>) -> f64 {
    if is_item(item, frame.previously_selected) {
        1.0 - frame.selection_transition
    } else if is_item(item, frame.selected) {
        frame.selection_transition
    } else {
        0.0
    }
}
