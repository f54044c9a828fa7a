use crate::color::{ArgbColor, fade};
use crate::geometry::Rect;
use crate::surface::{Surface, SurfaceError};
use derive_more::{Display, From, Into};
use std::rc::Rc;

/// Caller-assigned identity of a menu item. Unique within one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct ItemId(i32);

impl ItemId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> i32 {
        self.0
    }
}

pub trait MenuItem {
    fn id(&self) -> ItemId;

    /// Draws the item inside `bounds`, whose origin is the item's own top-left
    /// corner. `degree_selected` is 0 or 1, and in between while a selection
    /// change animates.
    fn draw(
        &self,
        _surface: &mut dyn Surface,
        _bounds: Rect,
        _degree_selected: f64,
    ) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// Paints the trigger button.
pub trait ButtonRenderer {
    fn draw_base(
        &self,
        surface: &mut dyn Surface,
        bounds: Rect,
        base_color: ArgbColor,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        surface.fill_oval(bounds, fade(base_color.to_srgba(), alpha))
    }

    fn draw_content(
        &self,
        surface: &mut dyn Surface,
        bounds: Rect,
        base_color: ArgbColor,
        alpha: f64,
    ) -> Result<(), SurfaceError>;
}

/// Ordered source of menu items. Must not change during a layout pass; tell
/// the view when it does.
pub trait Adapter {
    fn count(&self) -> usize;

    fn item_at(&self, position: usize) -> Option<Rc<dyn MenuItem>>;

    fn position_of(&self, id: ItemId) -> Option<usize> {
        (0..self.count()).find(|&i| self.item_at(i).is_some_and(|item| item.id() == id))
    }
}

/// Adapter over a fixed list that keeps the concrete item type reachable.
pub struct ArrayAdapter<T> {
    items: Vec<Rc<T>>,
}

impl<T: MenuItem + 'static> ArrayAdapter<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().map(Rc::new).collect(),
        }
    }

    pub fn items(&self) -> &[Rc<T>] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<&Rc<T>> {
        self.items.get(position)
    }

    pub fn find(&self, id: ItemId) -> Option<&Rc<T>> {
        self.items.iter().find(|item| item.id() == id)
    }
}

impl<T: MenuItem + 'static> Adapter for ArrayAdapter<T> {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn item_at(&self, position: usize) -> Option<Rc<dyn MenuItem>> {
        self.items
            .get(position)
            .map(|item| Rc::clone(item) as Rc<dyn MenuItem>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawOp, RecordingSurface};

    struct Plain(i32);

    impl MenuItem for Plain {
        fn id(&self) -> ItemId {
            ItemId::new(self.0)
        }
    }

    struct Blank;

    impl ButtonRenderer for Blank {
        fn draw_content(
            &self,
            _surface: &mut dyn Surface,
            _bounds: Rect,
            _base_color: ArgbColor,
            _alpha: f64,
        ) -> Result<(), SurfaceError> {
            Ok(())
        }
    }

    #[test]
    fn test_array_adapter_vends_items_in_order() {
        let adapter = ArrayAdapter::new([Plain(10), Plain(20), Plain(30)]);
        assert_eq!(adapter.count(), 3);
        assert_eq!(adapter.item_at(1).map(|i| i.id()), Some(ItemId::new(20)));
        assert!(adapter.item_at(3).is_none());
        assert_eq!(adapter.position_of(ItemId::new(30)), Some(2));
        assert_eq!(adapter.position_of(ItemId::new(99)), None);
    }

    #[test]
    fn test_vended_items_share_identity() {
        let adapter = ArrayAdapter::new([Plain(1)]);
        let vended = adapter.item_at(0).unwrap();
        let typed = adapter.get(0).unwrap();
        assert!(std::ptr::addr_eq(Rc::as_ptr(&vended), Rc::as_ptr(typed)));
    }

    #[test]
    fn test_default_button_base_is_faded_disc() {
        let mut surface = RecordingSurface::default();
        let bounds = Rect::new(0.0, 0.0, 56.0, 56.0);
        Blank
            .draw_base(&mut surface, bounds, ArgbColor::WHITE, 0.5)
            .unwrap();

        match surface.ops() {
            [DrawOp::FillOval { bounds: b, color }] => {
                assert_eq!(*b, bounds);
                assert!((color.alpha - 0.5).abs() < 1e-9);
            }
            ops => panic!("unexpected ops: {ops:?}"),
        }
    }
}
