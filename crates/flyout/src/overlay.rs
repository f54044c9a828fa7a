//! Lifetime of the transient full-screen surface the open menu draws into.

/// Platform hook that inserts and removes the full-bounds overlay above the
/// window's content.
pub trait OverlayHost {
    fn insert_overlay(&mut self);
    fn remove_overlay(&mut self);
}

/// Tracks whether the overlay is currently inserted. Attaching or detaching
/// twice in a row does nothing the second time, and an attached overlay is
/// removed when this is dropped.
#[derive(Default)]
pub struct OverlayAttachment {
    host: Option<Box<dyn OverlayHost>>,
    attached: bool,
}

impl OverlayAttachment {
    pub fn new(host: Box<dyn OverlayHost>) -> Self {
        Self {
            host: Some(host),
            attached: false,
        }
    }

    /// Swaps the platform hook, removing the overlay from the old one first.
    pub fn set_host(&mut self, host: Option<Box<dyn OverlayHost>>) {
        let was_attached = self.detach();
        self.host = host;
        if was_attached {
            self.attach();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Returns `true` if this call inserted the overlay.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        if let Some(host) = self.host.as_mut() {
            host.insert_overlay();
        }
        self.attached = true;
        log::debug!("menu overlay attached");
        true
    }

    /// Returns `true` if this call removed the overlay.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        if let Some(host) = self.host.as_mut() {
            host.remove_overlay();
        }
        self.attached = false;
        log::debug!("menu overlay detached");
        true
    }
}

impl Drop for OverlayAttachment {
    fn drop(&mut self) {
        self.detach();
    }
}
