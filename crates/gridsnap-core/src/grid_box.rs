//! Box model.

use crate::config::GridConfig;
use crate::grid::{self, GridPosition, PixelBounds};
use crate::ids::generate_id;
use crate::palette::BoxColor;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a box.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(String);

impl BoxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh process-unique id.
    pub fn generate() -> Self {
        Self(generate_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BoxId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BoxId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which geometry a box is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "bounds", rename_all = "camelCase")]
pub enum Placement {
    /// Rendered from the box's grid position.
    #[default]
    Grid,
    /// Rendered from free pixel bounds while being dragged or resized.
    Floating(PixelBounds),
}

impl Placement {
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating(_))
    }

    /// The pixel override, if any.
    pub fn floating_bounds(&self) -> Option<PixelBounds> {
        match self {
            Self::Grid => None,
            Self::Floating(bounds) => Some(*bounds),
        }
    }
}

/// A box to be added to a store. Boxes always enter unselected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBox {
    pub id: BoxId,
    pub grid_position: GridPosition,
    pub color: BoxColor,
}

impl NewBox {
    pub fn new(id: impl Into<BoxId>, grid_position: GridPosition, color: BoxColor) -> Self {
        Self {
            id: id.into(),
            grid_position,
            color,
        }
    }
}

/// A rectangular box laid out on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBox {
    pub(crate) id: BoxId,
    /// Authoritative grid location.
    pub grid_position: GridPosition,
    /// Pixel override while floating.
    pub placement: Placement,
    pub color: BoxColor,
}

impl GridBox {
    pub fn id(&self) -> &BoxId {
        &self.id
    }

    pub fn is_floating(&self) -> bool {
        self.placement.is_floating()
    }

    /// Pixel bounds the box should be drawn at.
    pub fn bounds(&self, config: &GridConfig, container_width: f64) -> PixelBounds {
        match self.placement {
            Placement::Grid => grid::absolute_bounds(config, container_width, &self.grid_position),
            Placement::Floating(bounds) => bounds,
        }
    }

    /// Pixel rect the box should be drawn at.
    pub fn rect(&self, config: &GridConfig, container_width: f64) -> Rect {
        self.bounds(config, container_width).rect()
    }
}

impl From<NewBox> for GridBox {
    fn from(new_box: NewBox) -> Self {
        Self {
            id: new_box.id,
            grid_position: new_box.grid_position,
            placement: Placement::Grid,
            color: new_box.color,
        }
    }
}

/// Read-only view of a box for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSnapshot {
    pub id: BoxId,
    pub grid_position: GridPosition,
    pub absolute_position: Option<PixelBounds>,
    pub is_selected: bool,
    pub color: BoxColor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;
    use kurbo::{Point, Size};

    fn sample() -> GridBox {
        NewBox::new("box-2", GridPosition::new(2, 0, 3, 2), PALETTE[1]).into()
    }

    #[test]
    fn test_new_box_is_grid_governed() {
        let grid_box = sample();
        assert_eq!(grid_box.id().as_str(), "box-2");
        assert_eq!(grid_box.placement, Placement::Grid);
        assert!(!grid_box.is_floating());
    }

    #[test]
    fn test_bounds_from_grid() {
        let grid_box = sample();
        let bounds = grid_box.rect(&GridConfig::default(), 1072.0);
        assert!((bounds.x0 - 216.0).abs() < 1e-9);
        assert!((bounds.width() - 316.0).abs() < 1e-9);
        assert!((bounds.height() - 208.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_from_floating_override() {
        let mut grid_box = sample();
        let bounds = PixelBounds::new(Point::new(13.0, 17.0), Size::new(200.0, 80.0));
        grid_box.placement = Placement::Floating(bounds);

        assert!(grid_box.is_floating());
        assert_eq!(grid_box.bounds(&GridConfig::default(), 1072.0), bounds);
        assert_eq!(
            grid_box.rect(&GridConfig::default(), 1072.0),
            Rect::new(13.0, 17.0, 213.0, 97.0)
        );
        assert_eq!(grid_box.placement.floating_bounds(), Some(bounds));
    }

    #[test]
    fn test_box_id_conversions() {
        let id = BoxId::from("box-1");
        assert_eq!(id.to_string(), "box-1");
        assert_eq!(BoxId::from(String::from("box-1")), id);
        assert!(BoxId::generate().as_str().starts_with("box-"));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "box-2");
        assert_eq!(json["gridPosition"]["columnSpan"], 3);
        assert_eq!(json["placement"]["mode"], "grid");
        assert_eq!(json["color"], "#4ECDC4");
    }
}
