//! Policies that pack menu items into the panel.

use crate::geometry::{Point, Rect, Size};
use std::num::NonZeroU32;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Grid layout needs exactly one of columns or rows fixed (columns: {columns}, rows: {rows})")]
    InvalidGrid { columns: u32, rows: u32 },
}

/// Size of one item cell and the gap kept around every cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemMetrics {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl ItemMetrics {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }
}

pub trait Layout {
    /// Smallest panel that shows `item_count` items.
    fn minimum_size(&self, item_count: usize, metrics: ItemMetrics) -> Size;

    /// Cell of the item at `index`, relative to the panel's top-left corner.
    fn rect_for_item(&self, index: usize, metrics: ItemMetrics) -> Rect;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridSpan {
    Columns(NonZeroU32),
    Rows(NonZeroU32),
}

/// Items in reading order on a grid with either a fixed column count (growing
/// downward) or a fixed row count (growing rightward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    span: GridSpan,
}

impl GridLayout {
    pub const UNSPECIFIED: u32 = 0;

    /// Exactly one of `columns` and `rows` must be [`GridLayout::UNSPECIFIED`].
    pub fn new(columns: u32, rows: u32) -> Result<Self, LayoutError> {
        match (NonZeroU32::new(columns), NonZeroU32::new(rows)) {
            (Some(columns), None) => Ok(Self::with_columns(columns)),
            (None, Some(rows)) => Ok(Self::with_rows(rows)),
            _ => Err(LayoutError::InvalidGrid { columns, rows }),
        }
    }

    pub fn with_columns(columns: NonZeroU32) -> Self {
        Self {
            span: GridSpan::Columns(columns),
        }
    }

    pub fn with_rows(rows: NonZeroU32) -> Self {
        Self {
            span: GridSpan::Rows(rows),
        }
    }

    pub fn columns(&self) -> Option<u32> {
        match self.span {
            GridSpan::Columns(columns) => Some(columns.get()),
            GridSpan::Rows(_) => None,
        }
    }

    pub fn rows(&self) -> Option<u32> {
        match self.span {
            GridSpan::Rows(rows) => Some(rows.get()),
            GridSpan::Columns(_) => None,
        }
    }

    /// `(columns, rows)` needed for `item_count` items.
    pub fn dimensions(&self, item_count: usize) -> (usize, usize) {
        match self.span {
            GridSpan::Columns(columns) => {
                let columns = columns.get() as usize;
                (columns, item_count.div_ceil(columns))
            }
            GridSpan::Rows(rows) => {
                let rows = rows.get() as usize;
                (item_count.div_ceil(rows), rows)
            }
        }
    }

    /// `(column, row)` of the item at `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        match self.span {
            GridSpan::Columns(columns) => {
                let columns = columns.get() as usize;
                (index % columns, index / columns)
            }
            GridSpan::Rows(rows) => {
                let rows = rows.get() as usize;
                (index / rows, index % rows)
            }
        }
    }
}

/// Length of `count` cells of `extent` separated and surrounded by `margin`.
fn span_length(count: usize, extent: f64, margin: f64) -> f64 {
    count as f64 * extent + (count + 1) as f64 * margin
}

impl Layout for GridLayout {
    fn minimum_size(&self, item_count: usize, metrics: ItemMetrics) -> Size {
        let (columns, rows) = self.dimensions(item_count);
        Size::new(
            span_length(columns, metrics.width, metrics.margin),
            span_length(rows, metrics.height, metrics.margin),
        )
    }

    fn rect_for_item(&self, index: usize, metrics: ItemMetrics) -> Rect {
        let (column, row) = self.cell(index);
        let origin = Point::new(
            column as f64 * metrics.width + (column + 1) as f64 * metrics.margin,
            row as f64 * metrics.height + (row + 1) as f64 * metrics.margin,
        );
        Rect::from_origin_size(origin, Size::new(metrics.width, metrics.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: ItemMetrics = ItemMetrics {
        width: 48.0,
        height: 48.0,
        margin: 8.0,
    };

    #[test]
    fn test_grid_requires_exactly_one_fixed_span() {
        assert_eq!(
            GridLayout::new(3, 2),
            Err(LayoutError::InvalidGrid { columns: 3, rows: 2 })
        );
        assert_eq!(
            GridLayout::new(GridLayout::UNSPECIFIED, GridLayout::UNSPECIFIED),
            Err(LayoutError::InvalidGrid { columns: 0, rows: 0 })
        );
        assert_eq!(GridLayout::new(3, 0).unwrap().columns(), Some(3));
        assert_eq!(GridLayout::new(0, 4).unwrap().rows(), Some(4));
    }

    #[test]
    fn test_three_columns_seven_items() {
        let grid = GridLayout::new(3, GridLayout::UNSPECIFIED).unwrap();
        assert_eq!(grid.minimum_size(7, METRICS), Size::new(176.0, 176.0));
        assert_eq!(grid.rect_for_item(4, METRICS), Rect::new(64.0, 64.0, 112.0, 112.0));
        assert_eq!(grid.rect_for_item(6, METRICS), Rect::new(8.0, 120.0, 56.0, 168.0));
    }

    #[test]
    fn test_fixed_rows_grow_rightward() {
        let grid = GridLayout::new(GridLayout::UNSPECIFIED, 2).unwrap();
        assert_eq!(grid.minimum_size(5, METRICS), Size::new(176.0, 120.0));
        assert_eq!(grid.rect_for_item(3, METRICS), Rect::new(64.0, 64.0, 112.0, 112.0));
        assert_eq!(grid.rect_for_item(4, METRICS), Rect::new(120.0, 8.0, 168.0, 56.0));
    }

    #[test]
    fn test_empty_grid_is_margin_only() {
        let grid = GridLayout::new(4, 0).unwrap();
        assert_eq!(grid.minimum_size(0, METRICS), Size::new(4.0 * 48.0 + 5.0 * 8.0, 8.0));

        let grid = GridLayout::new(0, 4).unwrap();
        assert_eq!(grid.minimum_size(0, METRICS), Size::new(8.0, 4.0 * 48.0 + 5.0 * 8.0));
    }

    #[test]
    fn test_tiles_do_not_overlap_and_fill_minimum_size() {
        for columns in 1..=6 {
            let grid = GridLayout::new(columns, 0).unwrap();
            for count in 1..=20 {
                let rects: Vec<Rect> = (0..count).map(|i| grid.rect_for_item(i, METRICS)).collect();

                for (i, a) in rects.iter().enumerate() {
                    for b in &rects[i + 1..] {
                        assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
                    }
                }

                let right = rects.iter().map(|r| r.right).fold(f64::MIN, f64::max);
                let bottom = rects.iter().map(|r| r.bottom).fold(f64::MIN, f64::max);
                let left = rects.iter().map(|r| r.left).fold(f64::MAX, f64::min);
                let top = rects.iter().map(|r| r.top).fold(f64::MAX, f64::min);
                assert_eq!((left, top), (METRICS.margin, METRICS.margin));

                let size = grid.minimum_size(count, METRICS);
                let full_rows = count >= columns as usize;
                if full_rows {
                    assert_eq!(size.width, right + METRICS.margin);
                }
                assert_eq!(size.height, bottom + METRICS.margin);
            }
        }
    }
}
