//! Mouse interaction: turns pointer events into store operations.
//!
//! A press on an unselected box selects it, leaving any floating box to the
//! store's reselect policy. A press on the selected box starts a drag, or a
//! resize when it lands on the bottom-right handle. A press on empty space
//! deselects the selected box, snapping it to the grid.
//! Releasing the button ends the session but leaves the box selected and
//! floating until the next press decides its fate.

use crate::grid::PixelBounds;
use crate::grid_box::BoxId;
use crate::store::{BoxStore, StoreResult};
use kurbo::{Point, Rect, Size, Vec2};

/// Side length of the square resize handle, in pixels.
pub const RESIZE_HANDLE_SIZE: f64 = 20.0;
/// Smallest width or height a resize can produce, in pixels.
pub const MIN_BOX_SIZE: f64 = 50.0;

/// Resize handle rect for a box drawn at `bounds`.
pub fn resize_handle(bounds: &PixelBounds) -> Rect {
    let rect = bounds.rect();
    Rect::new(
        rect.x1 - RESIZE_HANDLE_SIZE,
        rect.y1 - RESIZE_HANDLE_SIZE,
        rect.x1,
        rect.y1,
    )
}

/// An active move of the selected box.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub box_id: BoxId,
    /// Pointer position when the drag started.
    pub start_pointer: Point,
    /// Box origin when the drag started.
    pub start_origin: Point,
}

impl DragSession {
    /// Box origin for the current pointer, kept inside the container's top-left.
    pub fn target(&self, pointer: Point) -> Point {
        let delta: Vec2 = pointer - self.start_pointer;
        Point::new(
            (self.start_origin.x + delta.x).max(0.0),
            (self.start_origin.y + delta.y).max(0.0),
        )
    }
}

/// An active resize of the selected box.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub box_id: BoxId,
    pub start_pointer: Point,
    pub start_size: Size,
}

impl ResizeSession {
    /// Box size for the current pointer, never below [`MIN_BOX_SIZE`].
    pub fn target(&self, pointer: Point) -> Size {
        let delta: Vec2 = pointer - self.start_pointer;
        Size::new(
            (self.start_size.width + delta.x).max(MIN_BOX_SIZE),
            (self.start_size.height + delta.y).max(MIN_BOX_SIZE),
        )
    }
}

/// Current pointer session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

/// Drives a [`BoxStore`] from mouse events.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    state: InteractionState,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Whether a drag or resize is in progress.
    pub fn is_active(&self) -> bool {
        self.state != InteractionState::Idle
    }

    /// Handle a button press at `point` (container coordinates).
    pub fn pointer_down(&mut self, store: &mut BoxStore, point: Point, container_width: f64) -> StoreResult<()> {
        self.state = InteractionState::Idle;

        let hit = store.box_at(point, container_width).cloned();
        let selected = store
            .selected_box()
            .map(|b| (b.id().clone(), b.bounds(store.config(), container_width)));

        if let Some((selected_id, bounds)) = selected {
            if hit.as_ref() == Some(&selected_id) {
                self.state = if resize_handle(&bounds).contains(point) {
                    log::debug!("Resize started on {}", selected_id);
                    InteractionState::Resizing(ResizeSession {
                        box_id: selected_id,
                        start_pointer: point,
                        start_size: bounds.size,
                    })
                } else {
                    log::debug!("Drag started on {}", selected_id);
                    InteractionState::Dragging(DragSession {
                        box_id: selected_id,
                        start_pointer: point,
                        start_origin: bounds.position,
                    })
                };
                return Ok(());
            }
            if hit.is_none() {
                return store.deselect(&selected_id, bounds.position, bounds.size, container_width);
            }
        }

        match hit {
            Some(hit) => store.select(&hit),
            None => Ok(()),
        }
    }

    /// Handle pointer motion. Only has an effect during a session.
    pub fn pointer_move(&mut self, store: &mut BoxStore, point: Point, container_width: f64) -> StoreResult<()> {
        match &self.state {
            InteractionState::Idle => Ok(()),
            InteractionState::Dragging(session) => {
                store.update_box_position(&session.box_id, session.target(point), container_width)
            }
            InteractionState::Resizing(session) => {
                store.update_box_size(&session.box_id, session.target(point), container_width)
            }
        }
    }

    /// Handle a button release, ending any session.
    pub fn pointer_up(&mut self) {
        if self.is_active() {
            log::debug!("Pointer session ended");
        }
        self.state = InteractionState::Idle;
    }

    /// Deselect the selected box at its current bounds, if there is one.
    pub fn release_selection(&mut self, store: &mut BoxStore, container_width: f64) -> StoreResult<()> {
        self.state = InteractionState::Idle;
        let Some((id, bounds)) = store
            .selected_box()
            .map(|b| (b.id().clone(), b.bounds(store.config(), container_width)))
        else {
            return Ok(());
        };
        store.deselect(&id, bounds.position, bounds.size, container_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::grid::GridPosition;
    use crate::grid_box::NewBox;
    use crate::palette::PALETTE;
    use crate::store::ReselectPolicy;

    const WIDTH: f64 = 1072.0;

    fn store() -> BoxStore {
        BoxStore::with_boxes(
            GridConfig::default(),
            vec![
                NewBox::new("a", GridPosition::new(0, 0, 2, 1), PALETTE[0]),
                NewBox::new("b", GridPosition::new(2, 0, 3, 2), PALETTE[1]),
            ],
        )
    }

    #[test]
    fn test_first_press_selects_without_drag() {
        let mut store = store();
        let mut interaction = Interaction::new();

        interaction.pointer_down(&mut store, Point::new(50.0, 50.0), WIDTH).unwrap();
        assert!(store.is_selected(&BoxId::from("a")));
        assert!(!interaction.is_active());
    }

    #[test]
    fn test_drag_moves_by_pointer_delta() {
        let mut store = store();
        let mut interaction = Interaction::new();
        let a = BoxId::from("a");

        interaction.pointer_down(&mut store, Point::new(50.0, 50.0), WIDTH).unwrap();
        interaction.pointer_down(&mut store, Point::new(60.0, 40.0), WIDTH).unwrap();
        assert!(matches!(interaction.state(), InteractionState::Dragging(_)));

        interaction.pointer_move(&mut store, Point::new(160.0, 90.0), WIDTH).unwrap();
        let bounds = store.get(&a).unwrap().placement.floating_bounds().unwrap();
        assert_eq!(bounds.position, Point::new(100.0, 50.0));
        assert_eq!(bounds.size, Size::new(208.0, 100.0));

        interaction.pointer_up();
        assert!(!interaction.is_active());
        assert!(store.is_selected(&a));
        assert!(store.get(&a).unwrap().is_floating());
    }

    #[test]
    fn test_drag_clamps_to_container_origin() {
        let session = DragSession {
            box_id: BoxId::from("a"),
            start_pointer: Point::new(100.0, 100.0),
            start_origin: Point::new(30.0, 20.0),
        };
        assert_eq!(session.target(Point::new(0.0, 0.0)), Point::ZERO);
        assert_eq!(session.target(Point::new(110.0, 95.0)), Point::new(40.0, 15.0));
    }

    #[test]
    fn test_resize_from_handle() {
        let mut store = store();
        let mut interaction = Interaction::new();
        let a = BoxId::from("a");

        interaction.pointer_down(&mut store, Point::new(50.0, 50.0), WIDTH).unwrap();
        // Bottom-right corner of "a" is (208, 100).
        interaction.pointer_down(&mut store, Point::new(200.0, 95.0), WIDTH).unwrap();
        assert!(matches!(interaction.state(), InteractionState::Resizing(_)));

        interaction.pointer_move(&mut store, Point::new(300.0, 215.0), WIDTH).unwrap();
        let bounds = store.get(&a).unwrap().placement.floating_bounds().unwrap();
        assert_eq!(bounds.position, Point::ZERO);
        assert_eq!(bounds.size, Size::new(308.0, 220.0));

        interaction.pointer_move(&mut store, Point::new(-500.0, -500.0), WIDTH).unwrap();
        let bounds = store.get(&a).unwrap().placement.floating_bounds().unwrap();
        assert_eq!(bounds.size, Size::new(MIN_BOX_SIZE, MIN_BOX_SIZE));
    }

    #[test]
    fn test_press_outside_deselects_and_snaps() {
        let mut store = store();
        let mut interaction = Interaction::new();
        let a = BoxId::from("a");

        interaction.pointer_down(&mut store, Point::new(50.0, 50.0), WIDTH).unwrap();
        interaction.pointer_down(&mut store, Point::new(50.0, 50.0), WIDTH).unwrap();
        interaction.pointer_move(&mut store, Point::new(160.0, 270.0), WIDTH).unwrap();
        interaction.pointer_up();

        interaction.pointer_down(&mut store, Point::new(900.0, 600.0), WIDTH).unwrap();
        assert!(store.selected_id().is_none());
        let grid_box = store.get(&a).unwrap();
        assert_eq!(grid_box.grid_position, GridPosition::new(1, 2, 2, 1));
        assert!(!grid_box.is_floating());
    }

    #[test]
    fn test_press_on_other_box_switches_selection() {
        let mut store = store();
        let mut interaction = Interaction::new();

        interaction.pointer_down(&mut store, Point::new(50.0, 50.0), WIDTH).unwrap();
        interaction.pointer_down(&mut store, Point::new(300.0, 100.0), WIDTH).unwrap();

        assert!(store.is_selected(&BoxId::from("b")));
        assert!(!interaction.is_active());
        assert!(store.check_invariants().is_ok());
    }

    /// Select "a", drag it two rows down and release, then press on "b".
    fn switch_after_drag(store: &mut BoxStore) {
        let mut interaction = Interaction::new();
        interaction.pointer_down(store, Point::new(50.0, 50.0), WIDTH).unwrap();
        interaction.pointer_down(store, Point::new(50.0, 50.0), WIDTH).unwrap();
        interaction.pointer_move(store, Point::new(50.0, 300.0), WIDTH).unwrap();
        interaction.pointer_up();
        interaction.pointer_down(store, Point::new(300.0, 100.0), WIDTH).unwrap();
    }

    #[test]
    fn test_switching_selection_discards_floating_box() {
        let mut store = store();
        switch_after_drag(&mut store);

        let a = store.get(&BoxId::from("a")).unwrap();
        assert_eq!(a.grid_position, GridPosition::new(0, 0, 2, 1));
        assert!(!a.is_floating());
        assert!(store.is_selected(&BoxId::from("b")));
    }

    #[test]
    fn test_switching_selection_snaps_back_with_policy() {
        let mut store = store().with_reselect_policy(ReselectPolicy::SnapBack);
        switch_after_drag(&mut store);

        let a = store.get(&BoxId::from("a")).unwrap();
        assert_eq!(a.grid_position, GridPosition::new(0, 2, 2, 1));
        assert!(!a.is_floating());
        assert!(store.is_selected(&BoxId::from("b")));
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut store = store();
        let mut interaction = Interaction::new();
        interaction.pointer_move(&mut store, Point::new(10.0, 10.0), WIDTH).unwrap();
        assert!(store.boxes().iter().all(|b| !b.is_floating()));
    }

    #[test]
    fn test_release_selection() {
        let mut store = store();
        let mut interaction = Interaction::new();
        interaction.release_selection(&mut store, WIDTH).unwrap();

        interaction.pointer_down(&mut store, Point::new(300.0, 100.0), WIDTH).unwrap();
        interaction.release_selection(&mut store, WIDTH).unwrap();
        assert!(store.selected_id().is_none());
        assert_eq!(store.get(&BoxId::from("b")).unwrap().grid_position, GridPosition::new(2, 0, 3, 2));
    }

    #[test]
    fn test_resize_handle_rect() {
        let bounds = PixelBounds::new(Point::new(10.0, 10.0), Size::new(100.0, 60.0));
        assert_eq!(resize_handle(&bounds), Rect::new(90.0, 50.0, 110.0, 70.0));
    }
}
