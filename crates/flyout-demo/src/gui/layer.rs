use flyout::OverlayHost;
use gtk::prelude::*;
use gtk4 as gtk;
use std::cell::Cell;
use std::rc::Rc;

/// Shares one full-window drawing area between every menu. The layer only
/// takes pointer input while at least one menu is attached to it.
#[derive(Clone)]
pub struct LayerHost {
    area: gtk::DrawingArea,
    attached: Rc<Cell<usize>>,
}

impl LayerHost {
    pub fn new(area: gtk::DrawingArea) -> Self {
        area.set_can_target(false);
        Self {
            area,
            attached: Rc::default(),
        }
    }

    pub fn area(&self) -> &gtk::DrawingArea {
        &self.area
    }
}

impl OverlayHost for LayerHost {
    fn insert_overlay(&mut self) {
        self.attached.set(self.attached.get() + 1);
        self.area.set_can_target(true);
        self.area.queue_draw();
    }

    fn remove_overlay(&mut self) {
        let remaining = self.attached.get().saturating_sub(1);
        self.attached.set(remaining);
        self.area.set_can_target(remaining > 0);
        self.area.queue_draw();
    }
}
