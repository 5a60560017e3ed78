//! GridSnap Core Library
//!
//! Grid coordinate engine and box state machine for a snapping grid layout:
//! boxes float at pixel coordinates while selected and snap back to grid
//! cells when released.

pub mod config;
pub mod grid;
pub mod grid_box;
pub mod ids;
pub mod interaction;
pub mod palette;
pub mod store;

pub use config::{ConfigError, ConfigResult, GridConfig};
pub use grid::{GridPosition, PixelBounds};
pub use grid_box::{BoxId, BoxSnapshot, GridBox, NewBox, Placement};
pub use interaction::{DragSession, Interaction, InteractionState, ResizeSession};
pub use palette::{BoxColor, PALETTE, random_color};
pub use store::{BoxStore, ReselectPolicy, StoreError, StoreResult};
