//! Box store: the authoritative box collection and its selection.
//!
//! At most one box is selected at a time. Selection is tracked by id in a
//! single field, so exclusivity holds by construction and
//! [`BoxStore::check_invariants`] only has to verify the id still resolves.

use crate::config::GridConfig;
use crate::grid::{self, GridPosition, PixelBounds};
use crate::grid_box::{BoxId, BoxSnapshot, GridBox, NewBox, Placement};
use crate::palette::random_color;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Rows always shown, even for an empty grid.
pub const MIN_VISIBLE_ROWS: u32 = 5;
/// Empty rows kept below the lowest box.
pub const SPARE_ROWS: u32 = 2;
/// Column span given to boxes created by [`BoxStore::spawn_box`].
pub const NEW_BOX_COLUMN_SPAN: u32 = 2;
/// Row span given to boxes created by [`BoxStore::spawn_box`].
pub const NEW_BOX_ROW_SPAN: u32 = 1;

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Box not found: {0}")]
    InvalidReference(BoxId),
    #[error("Selected box is not in the collection: {0}")]
    DanglingSelection(BoxId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// What happens to a floating box when another box is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReselectPolicy {
    /// Drop the pixel override; the box returns to its last grid position.
    #[default]
    Discard,
    /// Snap the floating bounds to the grid before switching selection.
    SnapBack,
}

/// Owns all boxes on a grid and the current selection.
#[derive(Debug, Clone)]
pub struct BoxStore {
    config: GridConfig,
    /// Boxes in insertion order (back to front).
    boxes: Vec<GridBox>,
    selected: Option<BoxId>,
    reselect_policy: ReselectPolicy,
    /// Container width from the most recent pixel operation.
    last_container_width: Option<f64>,
}

impl BoxStore {
    /// Create an empty store.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            boxes: Vec::new(),
            selected: None,
            reselect_policy: ReselectPolicy::default(),
            last_container_width: None,
        }
    }

    /// Create a store seeded with unselected boxes.
    pub fn with_boxes(config: GridConfig, boxes: impl IntoIterator<Item = NewBox>) -> Self {
        let mut store = Self::new(config);
        store.boxes.extend(boxes.into_iter().map(GridBox::from));
        store
    }

    /// Use a different policy for floating boxes on reselection.
    pub fn with_reselect_policy(mut self, policy: ReselectPolicy) -> Self {
        self.reselect_policy = policy;
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn reselect_policy(&self) -> ReselectPolicy {
        self.reselect_policy
    }

    /// All boxes in insertion order.
    pub fn boxes(&self) -> &[GridBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Get a box by id.
    pub fn get(&self, id: &BoxId) -> Option<&GridBox> {
        self.boxes.iter().find(|b| b.id == *id)
    }

    pub fn selected_id(&self) -> Option<&BoxId> {
        self.selected.as_ref()
    }

    pub fn selected_box(&self) -> Option<&GridBox> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: &BoxId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    fn index_of(&self, id: &BoxId) -> StoreResult<usize> {
        self.boxes.iter().position(|b| b.id == *id).ok_or_else(|| {
            log::warn!("Ignoring operation on unknown box {}", id);
            StoreError::InvalidReference(id.clone())
        })
    }

    /// Select a box, deselecting any other.
    ///
    /// The previously selected box loses its pixel override according to the
    /// store's [`ReselectPolicy`]. Reselecting the already selected box keeps
    /// its override.
    pub fn select(&mut self, id: &BoxId) -> StoreResult<()> {
        self.index_of(id)?;

        if let Some(previous) = self.selected.take() {
            if previous != *id {
                self.release(&previous);
            }
        }

        log::debug!("Selected box {}", id);
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Drop the pixel override of a box that is losing selection.
    fn release(&mut self, id: &BoxId) {
        let Some(index) = self.boxes.iter().position(|b| b.id == *id) else {
            return;
        };
        let Placement::Floating(bounds) = self.boxes[index].placement else {
            return;
        };

        match (self.reselect_policy, self.last_container_width) {
            (ReselectPolicy::SnapBack, Some(container_width)) => {
                self.commit_snap(index, bounds.position, bounds.size, container_width);
            }
            (ReselectPolicy::SnapBack, None) => {
                log::warn!("No container width known, discarding floating state of {}", id);
                self.boxes[index].placement = Placement::Grid;
            }
            (ReselectPolicy::Discard, _) => {
                log::debug!("Discarding floating state of {}", id);
                self.boxes[index].placement = Placement::Grid;
            }
        }
    }

    /// Snap pixel geometry onto a box's grid position and clear its override.
    ///
    /// A snap target outside the grid keeps the prior grid position.
    fn commit_snap(&mut self, index: usize, position: Point, size: Size, container_width: f64) {
        let target = grid::grid_position(&self.config, container_width, position, size);
        let grid_box = &mut self.boxes[index];

        if grid::is_valid_grid_position(&self.config, &target) {
            log::debug!(
                "Snapped box {} to column {} row {} ({}x{})",
                grid_box.id,
                target.column,
                target.row,
                target.column_span,
                target.row_span
            );
            grid_box.grid_position = target;
        } else {
            log::warn!(
                "Rejected snap of box {} to {:?}, keeping {:?}",
                grid_box.id,
                target,
                grid_box.grid_position
            );
        }
        grid_box.placement = Placement::Grid;
    }

    /// Deselect a box, snapping its final pixel geometry to the grid.
    ///
    /// The selection is only cleared when `id` is the selected box.
    pub fn deselect(&mut self, id: &BoxId, position: Point, size: Size, container_width: f64) -> StoreResult<()> {
        let index = self.index_of(id)?;
        self.last_container_width = Some(container_width);
        self.commit_snap(index, position, size, container_width);

        if self.is_selected(id) {
            self.selected = None;
        }
        log::debug!("Deselected box {}", id);
        Ok(())
    }

    /// Move a box to a pixel position.
    ///
    /// The first move seeds the override with the box's current grid size so
    /// dragging never resizes it; later moves only touch the position.
    pub fn update_box_position(&mut self, id: &BoxId, position: Point, container_width: f64) -> StoreResult<()> {
        let index = self.index_of(id)?;
        self.last_container_width = Some(container_width);

        let grid_box = &mut self.boxes[index];
        let size = match grid_box.placement {
            Placement::Grid => grid::box_size(&self.config, container_width, &grid_box.grid_position),
            Placement::Floating(bounds) => bounds.size,
        };
        grid_box.placement = Placement::Floating(PixelBounds::new(position, size));
        Ok(())
    }

    /// Resize a box to a pixel size.
    ///
    /// The first resize seeds the override with the box's current grid
    /// position so it doesn't jump; later resizes only touch the size.
    pub fn update_box_size(&mut self, id: &BoxId, size: Size, container_width: f64) -> StoreResult<()> {
        let index = self.index_of(id)?;
        self.last_container_width = Some(container_width);

        let grid_box = &mut self.boxes[index];
        let position = match grid_box.placement {
            Placement::Grid => grid::absolute_position(&self.config, container_width, &grid_box.grid_position),
            Placement::Floating(bounds) => bounds.position,
        };
        grid_box.placement = Placement::Floating(PixelBounds::new(position, size));
        Ok(())
    }

    /// Append an unselected box. Ids are not checked for uniqueness.
    pub fn add_box(&mut self, new_box: NewBox) {
        log::debug!("Added box {} at {:?}", new_box.id, new_box.grid_position);
        self.boxes.push(GridBox::from(new_box));
    }

    /// Add a default-sized box at the first free cell and return its id.
    pub fn spawn_box(&mut self) -> BoxId {
        let (column, row) = self.first_free_cell();
        let id = BoxId::generate();
        self.add_box(NewBox::new(
            id.clone(),
            GridPosition::new(column, row, NEW_BOX_COLUMN_SPAN, NEW_BOX_ROW_SPAN),
            random_color(),
        ));
        id
    }

    /// First `(column, row)` that is not the top-left cell of any box.
    ///
    /// Only box origins count as occupied, so the result may overlap a
    /// spanning box. Falls back to the origin when every visible cell is
    /// taken.
    pub fn first_free_cell(&self) -> (u32, u32) {
        let occupied: HashSet<(u32, u32)> = self
            .boxes
            .iter()
            .map(|b| (b.grid_position.column, b.grid_position.row))
            .collect();

        (0..self.rows_needed())
            .flat_map(|row| (0..self.config.columns).map(move |column| (column, row)))
            .find(|cell| !occupied.contains(cell))
            .unwrap_or((0, 0))
    }

    /// Number of rows to display: the lowest box edge plus spare rows.
    pub fn rows_needed(&self) -> u32 {
        let lowest = self
            .boxes
            .iter()
            .map(|b| b.grid_position.end_row())
            .fold(u64::from(MIN_VISIBLE_ROWS), u64::max);
        let rows = lowest.saturating_add(u64::from(SPARE_ROWS));
        u32::try_from(rows).unwrap_or(u32::MAX).max(MIN_VISIBLE_ROWS)
    }

    /// Topmost box under a pixel point.
    pub fn box_at(&self, point: Point, container_width: f64) -> Option<&BoxId> {
        self.boxes
            .iter()
            .rev()
            .find(|b| b.rect(&self.config, container_width).contains(point))
            .map(|b| &b.id)
    }

    /// Read-only copies of every box for rendering.
    pub fn snapshot(&self) -> Vec<BoxSnapshot> {
        self.boxes
            .iter()
            .map(|b| BoxSnapshot {
                id: b.id.clone(),
                grid_position: b.grid_position,
                absolute_position: b.placement.floating_bounds(),
                is_selected: self.is_selected(&b.id),
                color: b.color,
            })
            .collect()
    }

    /// Verify the selection refers to a box in the collection.
    pub fn check_invariants(&self) -> StoreResult<()> {
        match &self.selected {
            Some(id) if self.get(id).is_none() => Err(StoreError::DanglingSelection(id.clone())),
            _ => Ok(()),
        }
    }
}
