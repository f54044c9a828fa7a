//! The flyout menu itself: trigger button, gesture handling and animation.
//!
//! The host owns two drawing targets. The button is drawn in its own local
//! coordinates through [`FlyoutMenuView::draw_button`]; the full-screen
//! overlay, whose origin is the window's, is drawn through
//! [`FlyoutMenuView::draw_overlay`] while [`FlyoutMenuView::is_open`] holds.
//! [`FlyoutMenuView::set_frame`] tells the view where the button sits in
//! overlay coordinates.
//!
//! Nothing runs on its own. The host calls [`FlyoutMenuView::tick`] once per
//! frame while [`FlyoutMenuView::is_animating`] is true and redraws both
//! targets afterwards.

mod overlay;

use crate::anchor::MenuAnchor;
use crate::animation::{AnimationStep, Animator, Clock, Generation, SystemClock, ANIMATION_DURATION};
use crate::color::{ArgbColor, fade};
use crate::config::{ConfigError, MenuConfig};
use crate::geometry::{Point, Rect, Size};
use crate::item::{Adapter, ButtonRenderer, ItemId, MenuItem};
use crate::layout::{ItemMetrics, Layout};
use crate::overlay::{OverlayAttachment, OverlayHost};
use crate::shadow::ShadowImage;
use crate::surface::{Surface, SurfaceError, with_saved_state};
use overlay::{ButtonAnchor, Frame, MenuOverlay, Placement};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Open fraction at which the button has fully faded into the overlay.
const BUTTON_PINION: f64 = 0.25;

/// Receives the outcome of a menu interaction.
pub trait SelectionListener {
    fn on_item_selected(&mut self, item: &Rc<dyn MenuItem>);

    fn on_dismiss_without_selection(&mut self) {}
}

struct FnListener<S, D> {
    on_selected: S,
    on_dismissed: D,
}

impl<S, D> SelectionListener for FnListener<S, D>
where
    S: FnMut(&Rc<dyn MenuItem>),
    D: FnMut(),
{
    fn on_item_selected(&mut self, item: &Rc<dyn MenuItem>) {
        (self.on_selected)(item)
    }

    fn on_dismiss_without_selection(&mut self) {
        (self.on_dismissed)()
    }
}

/// Builds a [`SelectionListener`] from a pair of closures.
pub fn listener_fn<S, D>(on_selected: S, on_dismissed: D) -> Box<dyn SelectionListener>
where
    S: FnMut(&Rc<dyn MenuItem>) + 'static,
    D: FnMut() + 'static,
{
    Box::new(FnListener {
        on_selected,
        on_dismissed,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(action: PointerAction, position: Point) -> Self {
        Self { action, position }
    }
}

/// Size constraint the host places on the button along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasureSpec {
    Exactly(f64),
    AtMost(f64),
    #[default]
    Unspecified,
}

impl MeasureSpec {
    pub fn resolve(self, desired: f64) -> f64 {
        match self {
            Self::Exactly(size) => size,
            Self::AtMost(size) => desired.min(size),
            Self::Unspecified => desired,
        }
    }
}

/// Validated options, in the form drawing code consumes them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub button_size: f64,
    pub dialog_mode: bool,
    pub button_background_color: ArgbColor,
    pub menu_background_color: ArgbColor,
    pub selected_item_background_color: ArgbColor,
    pub shield_color: ArgbColor,
    pub shield_visible: bool,
    pub item_metrics: ItemMetrics,
    pub menu_margin: f64,
    pub anchor: MenuAnchor,
    pub button_elevation: f64,
    pub menu_elevation: f64,
    pub corner_radius: f64,
}

impl Settings {
    fn from_config(config: &MenuConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            button_size: config.button_size,
            dialog_mode: config.dialog_mode,
            button_background_color: config.button_background_color.opaque(),
            menu_background_color: config.menu_background_color.opaque(),
            selected_item_background_color: config.selected_item_background_color,
            shield_color: config.shield_color,
            shield_visible: config.shield_visible,
            item_metrics: ItemMetrics::new(config.item_width, config.item_height, config.item_margin),
            menu_margin: config.menu_margin,
            anchor: config.menu_anchor()?,
            button_elevation: config.button_elevation,
            menu_elevation: config.menu_elevation,
            corner_radius: config.menu_corner_radius,
        })
    }
}

pub struct FlyoutMenuView {
    settings: Settings,
    clock: Rc<dyn Clock>,

    adapter: Option<Rc<dyn Adapter>>,
    layout: Option<Rc<dyn Layout>>,
    renderer: Option<Rc<dyn ButtonRenderer>>,
    listener: Option<Box<dyn SelectionListener>>,

    /// Button bounds in overlay coordinates.
    frame: Rect,
    screen_size: Option<Size>,
    button_shadow: Option<ShadowImage>,

    overlay: MenuOverlay,
    attachment: OverlayAttachment,

    menu_animator: Animator,
    /// Generation of the in-flight close, whose completion detaches the overlay.
    closing: Option<Generation>,
    menu_open_transition: f64,

    selection_animator: Animator,
    selection_transition: f64,
    selected: Option<Weak<dyn MenuItem>>,
    previously_selected: Option<Weak<dyn MenuItem>>,

    opened_as_dialog: bool,
}

impl FlyoutMenuView {
    pub fn new(config: &MenuConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Rc::new(SystemClock))
    }

    pub fn with_clock(config: &MenuConfig, clock: Rc<dyn Clock>) -> Result<Self, ConfigError> {
        Ok(Self {
            settings: Settings::from_config(config)?,
            clock,
            adapter: None,
            layout: None,
            renderer: None,
            listener: None,
            frame: Rect::default(),
            screen_size: None,
            button_shadow: None,
            overlay: MenuOverlay::default(),
            attachment: OverlayAttachment::default(),
            menu_animator: Animator::default(),
            closing: None,
            menu_open_transition: 0.0,
            selection_animator: Animator::default(),
            selection_transition: 1.0,
            selected: None,
            previously_selected: None,
            opened_as_dialog: false,
        })
    }

    /// Replaces every option at once. On error the view is left unchanged.
    pub fn apply_config(&mut self, config: &MenuConfig) -> Result<(), ConfigError> {
        self.settings = Settings::from_config(config)?;
        self.button_shadow = None;
        self.overlay.invalidate_items();
        self.overlay.invalidate_shadow();
        Ok(())
    }

    pub fn set_adapter(&mut self, adapter: Option<Rc<dyn Adapter>>) {
        self.adapter = adapter;
        self.overlay.invalidate_items();
    }

    pub fn adapter(&self) -> Option<&Rc<dyn Adapter>> {
        self.adapter.as_ref()
    }

    /// Call when the adapter's items changed in place.
    pub fn notify_adapter_changed(&mut self) {
        self.overlay.invalidate_items();
    }

    pub fn set_layout(&mut self, layout: Option<Rc<dyn Layout>>) {
        self.layout = layout;
        self.overlay.invalidate_items();
    }

    /// `None` draws a plain disc in the button color.
    pub fn set_button_renderer(&mut self, renderer: Option<Rc<dyn ButtonRenderer>>) {
        self.renderer = renderer;
    }

    pub fn button_renderer(&self) -> Option<&Rc<dyn ButtonRenderer>> {
        self.renderer.as_ref()
    }

    pub fn set_selection_listener(&mut self, listener: Option<Box<dyn SelectionListener>>) {
        self.listener = listener;
    }

    pub fn set_overlay_host(&mut self, host: Option<Box<dyn OverlayHost>>) {
        self.attachment.set_host(host);
    }

    pub fn set_item_size(&mut self, width: f64, height: f64) {
        self.settings.item_metrics.width = width.max(0.0);
        self.settings.item_metrics.height = height.max(0.0);
        self.overlay.invalidate_items();
    }

    pub fn set_item_margin(&mut self, margin: f64) {
        self.settings.item_metrics.margin = margin.max(0.0);
        self.overlay.invalidate_items();
    }

    pub fn set_menu_margin(&mut self, margin: f64) {
        self.settings.menu_margin = margin.max(0.0);
        self.overlay.invalidate_fill();
    }

    pub fn set_menu_anchor(&mut self, anchor: MenuAnchor) {
        self.settings.anchor = anchor;
        self.overlay.invalidate_fill();
    }

    pub fn menu_anchor(&self) -> MenuAnchor {
        self.settings.anchor
    }

    pub fn set_button_size(&mut self, size: f64) {
        self.settings.button_size = size.max(0.0);
    }

    pub fn set_button_elevation(&mut self, elevation: f64) {
        self.settings.button_elevation = elevation.max(0.0);
        self.button_shadow = None;
    }

    pub fn set_menu_elevation(&mut self, elevation: f64) {
        self.settings.menu_elevation = elevation.max(0.0);
        self.overlay.invalidate_shadow();
    }

    pub fn set_dialog_mode(&mut self, dialog_mode: bool) {
        self.settings.dialog_mode = dialog_mode;
    }

    pub fn is_in_dialog_mode(&self) -> bool {
        self.settings.dialog_mode
    }

    /// Alpha is ignored; the button is always opaque.
    pub fn set_button_background_color(&mut self, color: ArgbColor) {
        self.settings.button_background_color = color.opaque();
    }

    /// Alpha is ignored; the panel is always opaque.
    pub fn set_menu_background_color(&mut self, color: ArgbColor) {
        self.settings.menu_background_color = color.opaque();
    }

    pub fn set_selected_item_background_color(&mut self, color: ArgbColor) {
        self.settings.selected_item_background_color = color;
    }

    pub fn set_shield(&mut self, color: ArgbColor, visible: bool) {
        self.settings.shield_color = color;
        self.settings.shield_visible = visible;
    }

    /// Places the button, in overlay coordinates.
    pub fn set_frame(&mut self, frame: Rect) {
        if frame != self.frame {
            self.frame = frame;
            self.button_shadow = None;
            self.overlay.invalidate_fill();
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Usable screen area the panel is kept inside, also the extent of the
    /// shield.
    pub fn set_screen_size(&mut self, size: Size) {
        if self.screen_size != Some(size) {
            self.screen_size = Some(size);
            self.overlay.invalidate_fill();
        }
    }

    pub fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> Size {
        Size::new(
            width.resolve(self.settings.button_size),
            height.resolve(self.settings.button_size),
        )
    }

    /// Button center and radius in the button's own coordinates.
    fn button_local(&self) -> (Point, f64) {
        let (w, h) = (self.frame.width(), self.frame.height());
        let radius = (w.min(h) / 2.0).max(0.0).floor();
        (Point::new(w / 2.0, h / 2.0), radius)
    }

    fn button_anchor(&self) -> ButtonAnchor {
        ButtonAnchor {
            center: self.frame.center(),
            radius: self.button_local().1,
        }
    }

    pub fn menu_open_transition(&self) -> f64 {
        self.menu_open_transition
    }

    pub fn selection_transition(&self) -> f64 {
        self.selection_transition
    }

    /// The overlay is attached: the menu is opening, open or closing.
    pub fn is_open(&self) -> bool {
        self.attachment.is_attached()
    }

    pub fn was_opened_as_dialog(&self) -> bool {
        self.opened_as_dialog
    }

    pub fn is_animating(&self) -> bool {
        self.menu_animator.is_running() || self.selection_animator.is_running()
    }

    /// Panel bounds in overlay coordinates, once computed.
    pub fn menu_panel(&self) -> Option<Rect> {
        self.overlay.panel()
    }

    pub fn selected_item(&self) -> Option<Rc<dyn MenuItem>> {
        self.selected.as_ref().and_then(Weak::upgrade)
    }

    pub fn selected_item_id(&self) -> Option<ItemId> {
        self.selected_item().map(|item| item.id())
    }

    fn prepare_overlay(&mut self) {
        let button = self.button_anchor();
        self.overlay.prepare(&Placement {
            adapter: self.adapter.as_deref(),
            layout: self.layout.as_deref(),
            settings: &self.settings,
            button,
            screen: self.screen_size,
        });
    }

    /// Item under `point`, given in overlay coordinates.
    pub fn item_at(&mut self, point: Point) -> Option<Rc<dyn MenuItem>> {
        self.prepare_overlay();
        self.overlay.item_at(point)
    }

    /// Pointer input on the button. `event.position` is in the button's
    /// coordinates. Returns whether the event was consumed.
    pub fn handle_button_pointer(&mut self, event: PointerEvent) -> bool {
        match event.action {
            PointerAction::Down => {
                self.animate_menu(true, false);
                self.opened_as_dialog = false;
            }
            PointerAction::Move => {}
            PointerAction::Up => {
                let local = Rect::from_origin_size(Point::default(), self.frame.size());
                if self.settings.dialog_mode && local.contains(event.position) {
                    log::debug!("menu left open as dialog");
                    self.opened_as_dialog = true;
                    return true;
                }
                let point = Point::new(
                    self.frame.left + event.position.x,
                    self.frame.top + event.position.y,
                );
                let item = self.item_at(point);
                self.dismiss_with_item(item);
            }
        }
        true
    }

    /// Pointer input on the overlay, in overlay coordinates. Only consumed
    /// while the menu was left open as a dialog.
    pub fn handle_overlay_pointer(&mut self, event: PointerEvent) -> bool {
        if !self.opened_as_dialog {
            return false;
        }
        if event.action == PointerAction::Up {
            let item = self.item_at(event.position);
            self.dismiss_with_item(item);
        }
        true
    }

    /// Closes the menu if it is showing. Returns whether it was.
    pub fn dismiss(&mut self) -> bool {
        if !self.attachment.is_attached() {
            return false;
        }
        self.opened_as_dialog = false;
        self.animate_menu(false, false);
        true
    }

    fn dismiss_with_item(&mut self, item: Option<Rc<dyn MenuItem>>) {
        self.opened_as_dialog = false;
        match item {
            Some(item) => {
                self.set_selected_item(&item);
                self.animate_menu(false, true);
            }
            None => {
                log::debug!("menu dismissed without selection");
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_dismiss_without_selection();
                }
                self.animate_menu(false, false);
            }
        }
    }

    fn animate_menu(&mut self, open: bool, delayed: bool) {
        if self.menu_animator.cancel() {
            log::trace!("replacing in-flight menu animation");
        }
        if open && self.adapter.is_none() {
            log::warn!("opening a flyout menu without an adapter");
        }

        let delay = if delayed { ANIMATION_DURATION } else { Duration::ZERO };
        let target = if open { 1.0 } else { 0.0 };
        let generation =
            self.menu_animator
                .start(self.menu_open_transition, target, delay, self.clock.now());

        if open {
            self.closing = None;
            self.attachment.attach();
        } else {
            self.closing = Some(generation);
        }
        log::debug!("menu {}", if open { "opening" } else { "closing" });
    }

    /// Selects `item` and notifies the listener. Selecting the item that is
    /// already selected does nothing.
    pub fn set_selected_item(&mut self, item: &Rc<dyn MenuItem>) {
        let current = self.selected_item();
        if current.is_some_and(|current| std::ptr::addr_eq(Rc::as_ptr(&current), Rc::as_ptr(item))) {
            return;
        }

        log::debug!("selected menu item {}", item.id());
        if let Some(listener) = self.listener.as_mut() {
            listener.on_item_selected(item);
        }

        self.previously_selected = self.selected.take();
        self.selected = Some(Rc::downgrade(item));
        self.selection_transition = 0.0;
        self.selection_animator
            .start(0.0, 1.0, Duration::ZERO, self.clock.now());
    }

    /// Out of range positions are ignored.
    pub fn set_selected_by_position(&mut self, position: usize) {
        if let Some(item) = self.adapter.as_ref().and_then(|a| a.item_at(position)) {
            self.set_selected_item(&item);
        }
    }

    /// Unknown ids are ignored.
    pub fn set_selected_by_id(&mut self, id: ItemId) {
        let item = self.adapter.as_ref().and_then(|adapter| {
            let position = adapter.position_of(id)?;
            adapter.item_at(position)
        });
        if let Some(item) = item {
            self.set_selected_item(&item);
        }
    }

    /// Advances both animations to the clock's current time. Returns whether
    /// another frame is needed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();

        match self.menu_animator.step(now) {
            AnimationStep::Idle => {}
            AnimationStep::Running(value) => self.menu_open_transition = value.clamp(0.0, 1.0),
            AnimationStep::Finished { value, generation } => {
                self.menu_open_transition = value.clamp(0.0, 1.0);
                if self.closing == Some(generation) {
                    self.closing = None;
                    self.attachment.detach();
                }
            }
        }

        match self.selection_animator.step(now) {
            AnimationStep::Idle => {}
            AnimationStep::Running(value) => self.selection_transition = value.clamp(0.0, 1.0),
            AnimationStep::Finished { value, .. } => {
                self.selection_transition = value.clamp(0.0, 1.0);
                self.previously_selected = None;
            }
        }

        self.is_animating()
    }

    /// Draws the trigger button in its own coordinates. It shrinks and fades
    /// out over the first quarter of the open animation.
    pub fn draw_button(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        if self.menu_open_transition >= BUTTON_PINION {
            return Ok(());
        }
        let alpha = 1.0 - self.menu_open_transition / BUTTON_PINION;
        let (center, radius) = self.button_local();
        if radius <= 0.0 {
            return Ok(());
        }

        if self.button_shadow.is_none() {
            self.button_shadow = ShadowImage::for_button(radius, self.settings.button_elevation);
        }

        let settings = &self.settings;
        let shadow = self.button_shadow.as_ref();
        let renderer = self.renderer.as_deref();
        with_saved_state(surface, |surface| {
            if alpha < 1.0 {
                surface.scale_about(center, alpha);
            }
            if let Some(shadow) = shadow {
                shadow.draw_centered(surface, center, alpha * alpha * alpha)?;
            }

            let bounds = Rect::around(center, radius);
            let color = settings.button_background_color;
            match renderer {
                Some(renderer) => {
                    renderer.draw_base(surface, bounds, color, alpha)?;
                    renderer.draw_content(surface, bounds, color, alpha)
                }
                None => surface.fill_oval(bounds, fade(color.to_srgba(), alpha)),
            }
        })
    }

    /// Draws the shield, the revealed panel and its items in overlay
    /// coordinates. Draws nothing while the overlay is detached.
    pub fn draw_overlay(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        if !self.attachment.is_attached() {
            return Ok(());
        }
        self.prepare_overlay();
        let frame = Frame {
            settings: &self.settings,
            button: self.button_anchor(),
            screen: self.screen_size,
            open_transition: self.menu_open_transition,
            selection_transition: self.selection_transition,
            selected: self.selected.as_ref(),
            previously_selected: self.previously_selected.as_ref(),
        };
        self.overlay.draw(surface, &frame)
    }
}
