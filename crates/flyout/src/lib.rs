//! A press-and-drag flyout menu.
//!
//! A circular trigger button expands, through a circular reveal, into a grid
//! of items drawn on a transient full-screen overlay. Releasing over an item
//! selects it; releasing anywhere else dismisses the menu.
//!
//! The crate owns geometry, layout, the gesture and animation state machine
//! and rendering through the [`Surface`] trait. Windowing, input delivery and
//! the frame clock belong to the host. Enable the `cairo` feature to draw
//! straight onto a `cairo::Context`.

pub mod anchor;
pub mod animation;
pub mod color;
pub mod config;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod overlay;
pub mod shadow;
pub mod surface;
pub mod view;

pub use anchor::{AnchorError, AxisAnchor, MenuAnchor};
pub use animation::{ANIMATION_DURATION, Clock, SystemClock};
pub use color::{ArgbColor, Color, ColorError};
pub use config::{ConfigError, MenuConfig};
pub use geometry::{Point, Rect, Size};
pub use item::{Adapter, ArrayAdapter, ButtonRenderer, ItemId, MenuItem};
pub use layout::{GridLayout, ItemMetrics, Layout, LayoutError};
pub use overlay::OverlayHost;
pub use surface::{Bitmap, Surface, SurfaceError};
pub use view::{
    FlyoutMenuView, MeasureSpec, PointerAction, PointerEvent, SelectionListener, listener_fn,
};
