//! Grid coordinate engine.
//!
//! Pure conversions between grid cells and container pixels. Every function
//! takes the grid config and the current container width explicitly; nothing
//! here holds state between calls.
//!
//! The container width is a caller contract: it must be at least the total
//! column gap width. A smaller width yields a zero or negative cell width and
//! the resulting geometry is returned as-is.

use crate::config::GridConfig;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A box location expressed in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub column: u32,
    pub row: u32,
    pub column_span: u32,
    pub row_span: u32,
}

impl GridPosition {
    pub fn new(column: u32, row: u32, column_span: u32, row_span: u32) -> Self {
        Self {
            column,
            row,
            column_span,
            row_span,
        }
    }

    /// One past the last column covered.
    pub fn end_column(&self) -> u64 {
        u64::from(self.column) + u64::from(self.column_span)
    }

    /// One past the last row covered.
    pub fn end_row(&self) -> u64 {
        u64::from(self.row) + u64::from(self.row_span)
    }
}

/// Pixel position and size of a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub position: Point,
    pub size: Size,
}

impl PixelBounds {
    pub fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// Width of one column for the given container width.
pub fn cell_width(config: &GridConfig, container_width: f64) -> f64 {
    (container_width - config.total_column_gaps()) / f64::from(config.columns)
}

/// Height of one row.
pub fn cell_height(config: &GridConfig) -> f64 {
    config.cell_height
}

/// Distance between the left edges of adjacent columns.
fn column_pitch(config: &GridConfig, container_width: f64) -> f64 {
    cell_width(config, container_width) + config.column_gap
}

/// Distance between the top edges of adjacent rows.
fn row_pitch(config: &GridConfig) -> f64 {
    cell_height(config) + config.row_gap
}

/// Nearest whole number of pitches in `value`.
fn nearest_cell(value: f64, pitch: f64) -> i64 {
    // NaN saturates to 0.
    (value / pitch).round() as i64
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Top-left pixel corner of a grid position.
pub fn absolute_position(config: &GridConfig, container_width: f64, grid_position: &GridPosition) -> Point {
    Point::new(
        f64::from(grid_position.column) * column_pitch(config, container_width),
        f64::from(grid_position.row) * row_pitch(config),
    )
}

/// Pixel size of a grid position: N cells plus the N-1 gaps between them.
pub fn box_size(config: &GridConfig, container_width: f64, grid_position: &GridPosition) -> Size {
    let columns = f64::from(grid_position.column_span);
    let rows = f64::from(grid_position.row_span);
    Size::new(
        columns * cell_width(config, container_width) + (columns - 1.0) * config.column_gap,
        rows * cell_height(config) + (rows - 1.0) * config.row_gap,
    )
}

/// Position and size of a grid position in one call. This is the render path.
pub fn absolute_bounds(config: &GridConfig, container_width: f64, grid_position: &GridPosition) -> PixelBounds {
    PixelBounds {
        position: absolute_position(config, container_width, grid_position),
        size: box_size(config, container_width, grid_position),
    }
}

/// Map pixel geometry back to the nearest grid position.
///
/// Spans never drop below 1. The column is pulled back inside the grid but
/// the span is left alone, so a span wider than the grid comes back
/// unchanged and fails [`is_valid_grid_position`]. Rows only clamp at 0.
pub fn grid_position(config: &GridConfig, container_width: f64, position: Point, size: Size) -> GridPosition {
    let column_pitch = column_pitch(config, container_width);
    let row_pitch = row_pitch(config);

    let column = nearest_cell(position.x, column_pitch);
    let row = nearest_cell(position.y, row_pitch);
    let column_span = nearest_cell(size.width, column_pitch).max(1);
    let row_span = nearest_cell(size.height, row_pitch).max(1);

    let max_column = i64::from(config.columns) - column_span;
    let column = column.min(max_column).max(0);

    GridPosition {
        column: to_u32(column),
        row: to_u32(row),
        column_span: to_u32(column_span),
        row_span: to_u32(row_span),
    }
}

/// Round a pixel position to the nearest cell corner, ignoring box size.
pub fn snap_to_grid(config: &GridConfig, container_width: f64, point: Point) -> Point {
    let column_pitch = column_pitch(config, container_width);
    let row_pitch = row_pitch(config);
    Point::new(
        (point.x / column_pitch).round() * column_pitch,
        (point.y / row_pitch).round() * row_pitch,
    )
}

/// Whether a grid position lies inside the grid's columns.
pub fn is_valid_grid_position(config: &GridConfig, grid_position: &GridPosition) -> bool {
    grid_position.column_span > 0
        && grid_position.row_span > 0
        && grid_position.end_column() <= u64::from(config.columns)
}

/// Pixel height of `rows` rows.
pub fn container_height(config: &GridConfig, rows: u32) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    let rows = f64::from(rows);
    rows * config.cell_height + (rows - 1.0) * config.row_gap
}

/// Pixel rect of every cell in the first `rows` rows, row-major.
///
/// Cells are produced lazily since `rows` has no upper bound.
pub fn cell_rects(config: &GridConfig, container_width: f64, rows: u32) -> impl Iterator<Item = Rect> + use<> {
    let width = cell_width(config, container_width);
    let height = cell_height(config);
    let column_pitch = width + config.column_gap;
    let row_pitch = height + config.row_gap;
    let columns = config.columns;

    (0..rows).flat_map(move |row| {
        (0..columns).map(move |column| {
            let origin = Point::new(f64::from(column) * column_pitch, f64::from(row) * row_pitch);
            Rect::from_origin_size(origin, Size::new(width, height))
        })
    })
}
