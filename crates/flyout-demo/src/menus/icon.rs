use super::MenuKind;
use crate::config::{DemoConfig, IconName};
use crate::gui::app::AppMsg;
use anyhow::Context;
use flyout::surface::with_saved_state;
use flyout::{
    ArgbColor, ArrayAdapter, Bitmap, ButtonRenderer, FlyoutMenuView, GridLayout, ItemId, MenuItem,
    Rect, Surface, SurfaceError, listener_fn,
};
use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use relm4::Sender;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const COLUMNS: u32 = 3;
const ICON_SIZE: i32 = 64;
const ITEM_INSET: f64 = 2.0;
const BUTTON_INSET: f64 = 8.0;

pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_ref());
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    lookup(icon_name.as_ref())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find()
}

/// Repacks 8-bit RGB or RGBA rows with arbitrary stride into a tight RGBA
/// bitmap.
fn bitmap_from_rows(
    width: u32,
    height: u32,
    channels: usize,
    stride: usize,
    data: &[u8],
) -> Option<Bitmap> {
    if channels != 3 && channels != 4 {
        return None;
    }
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height as usize {
        let row = data.get(y * stride..)?;
        for x in 0..width as usize {
            let px = row.get(x * channels..(x + 1) * channels)?;
            rgba.extend_from_slice(&px[..3]);
            rgba.push(if channels == 4 { px[3] } else { 0xFF });
        }
    }
    Bitmap::from_rgba(width, height, rgba)
}

fn load_icon(name: &IconName) -> anyhow::Result<Bitmap> {
    let path = find_icon_path(name).with_context(|| format!("Icon \"{}\" not found", name))?;
    let pixbuf = Pixbuf::from_file_at_size(&path, ICON_SIZE, ICON_SIZE)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    if pixbuf.bits_per_sample() != 8 {
        anyhow::bail!("Unsupported sample depth in {}", path.display());
    }
    let bytes = pixbuf.read_pixel_bytes();
    bitmap_from_rows(
        u32::try_from(pixbuf.width())?,
        u32::try_from(pixbuf.height())?,
        usize::try_from(pixbuf.n_channels())?,
        usize::try_from(pixbuf.rowstride())?,
        &bytes,
    )
    .with_context(|| format!("Unsupported pixel layout in {}", path.display()))
}

/// Scales `bitmap` to cover a disc inscribed in `bounds`.
fn draw_icon(
    surface: &mut dyn Surface,
    bounds: Rect,
    bitmap: &Bitmap,
    alpha: f64,
) -> Result<(), SurfaceError> {
    let source = bitmap.bounds();
    if source.width() <= 0.0 || source.height() <= 0.0 {
        return Ok(());
    }
    let scale = (bounds.width() / source.width()).max(bounds.height() / source.height());
    let target = Rect::around(bounds.center(), 0.0).inset(
        -source.width() * scale / 2.0,
        -source.height() * scale / 2.0,
    );
    with_saved_state(surface, |s| {
        s.clip_oval(bounds);
        s.draw_bitmap(bitmap, source, target, alpha)
    })
}

struct IconItem {
    id: ItemId,
    name: IconName,
    bitmap: Rc<Bitmap>,
}

impl MenuItem for IconItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn draw(&self, surface: &mut dyn Surface, bounds: Rect, _: f64) -> Result<(), SurfaceError> {
        draw_icon(surface, bounds.inset(ITEM_INSET, ITEM_INSET), &self.bitmap, 1.0)
    }
}

struct IconButton {
    bitmap: RefCell<Option<Rc<Bitmap>>>,
}

impl ButtonRenderer for IconButton {
    fn draw_content(
        &self,
        surface: &mut dyn Surface,
        bounds: Rect,
        _: ArgbColor,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        match self.bitmap.borrow().as_deref() {
            Some(bitmap) => draw_icon(
                surface,
                bounds.inset(BUTTON_INSET, BUTTON_INSET),
                bitmap,
                alpha,
            ),
            None => Ok(()),
        }
    }
}

pub fn build(config: &DemoConfig, sender: Sender<AppMsg>) -> anyhow::Result<FlyoutMenuView> {
    let mut view = FlyoutMenuView::new(&config.icon)?;

    let loaded = config
        .icons
        .iter()
        .filter_map(|name| match load_icon(name) {
            Ok(bitmap) => Some((name.clone(), Rc::new(bitmap))),
            Err(e) => {
                log::warn!("Skipping icon: {:#}", e);
                None
            }
        })
        .collect::<Vec<_>>();
    if loaded.is_empty() {
        log::warn!("No icons could be loaded, the icon menu will be empty");
    }

    let adapter = Rc::new(ArrayAdapter::new(loaded.into_iter().enumerate().map(
        |(i, (name, bitmap))| IconItem {
            id: ItemId::new(i as i32),
            name,
            bitmap,
        },
    )));
    let button = Rc::new(IconButton {
        bitmap: RefCell::default(),
    });

    view.set_layout(Some(Rc::new(GridLayout::new(COLUMNS, GridLayout::UNSPECIFIED)?)));
    view.set_adapter(Some(adapter.clone()));
    view.set_button_renderer(Some(button.clone()));

    let dismissed = sender.clone();
    view.set_selection_listener(Some(listener_fn(
        move |item| {
            if let Some(selected) = adapter.find(item.id()) {
                *button.bitmap.borrow_mut() = Some(Rc::clone(&selected.bitmap));
                sender.emit(AppMsg::Status(format!("Icon: {}", selected.name)));
            }
        },
        move || dismissed.emit(AppMsg::Dismissed(MenuKind::Icon)),
    )));
    view.set_selected_by_position(0);
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyout::surface::recording::{DrawOp, RecordingSurface};

    #[test]
    fn test_rgb_rows_with_padding() {
        // 2x2 RGB with a stride of 8, the final row unpadded.
        let data = [
            1, 2, 3, 4, 5, 6, 0, 0, //
            7, 8, 9, 10, 11, 12,
        ];
        let bitmap = bitmap_from_rows(2, 2, 3, 8, &data).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([1, 2, 3, 0xFF]));
        assert_eq!(bitmap.pixel(1, 1), Some([10, 11, 12, 0xFF]));
    }

    #[test]
    fn test_rgba_rows_keep_alpha() {
        let data = [1, 2, 3, 4];
        let bitmap = bitmap_from_rows(1, 1, 4, 4, &data).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([1, 2, 3, 4]));
    }

    #[test]
    fn test_short_or_odd_data_is_rejected() {
        assert!(bitmap_from_rows(2, 2, 3, 8, &[0; 10]).is_none());
        assert!(bitmap_from_rows(1, 1, 2, 2, &[0; 2]).is_none());
    }

    #[test]
    fn test_icon_covers_its_disc() {
        let bitmap = Bitmap::new(20, 10);
        let mut surface = RecordingSurface::default();
        draw_icon(&mut surface, Rect::new(0.0, 0.0, 40.0, 40.0), &bitmap, 1.0).unwrap();

        let ops = surface.ops();
        assert!(matches!(ops[1], DrawOp::ClipOval { .. }));
        match &ops[2] {
            DrawOp::Bitmap { dst, .. } => {
                assert_eq!(*dst, Rect::new(-20.0, 0.0, 60.0, 40.0));
            }
            op => panic!("unexpected op: {op:?}"),
        }
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_missing_icon_name() {
        assert!(find_icon_path(&IconName::new("")).is_none());
    }

    #[test]
    fn test_build_with_defaults() {
        // Icons missing from the host theme are skipped, never fatal.
        let (sender, _receiver) = relm4::channel();
        let view = build(&DemoConfig::default(), sender).unwrap();

        assert!(view.adapter().is_some());
        assert!(view.is_in_dialog_mode());
    }
}
