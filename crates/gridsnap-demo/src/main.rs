//! Headless GridSnap runner.
//!
//! Seeds a grid with the demo layout, replays a scripted mouse session
//! through the interaction controller and logs the resulting layout.
//!
//! Usage: `gridsnap [config.json] [container-width]`

use gridsnap_core::grid::{self, GridPosition};
use gridsnap_core::{BoxStore, GridConfig, Interaction, NewBox, PALETTE, StoreResult};
use kurbo::Point;
use std::path::Path;

/// Width used when none is given on the command line.
const DEFAULT_CONTAINER_WIDTH: f64 = 1072.0;

/// One scripted mouse event.
#[derive(Debug, Clone, Copy)]
enum Step {
    Down(f64, f64),
    Move(f64, f64),
    Up,
}

fn demo_boxes() -> Vec<NewBox> {
    vec![
        NewBox::new("box-1", GridPosition::new(0, 0, 2, 1), PALETTE[0]),
        NewBox::new("box-2", GridPosition::new(2, 0, 3, 2), PALETTE[1]),
        NewBox::new("box-3", GridPosition::new(5, 0, 2, 1), PALETTE[2]),
        NewBox::new("box-4", GridPosition::new(0, 1, 2, 2), PALETTE[3]),
        NewBox::new("box-5", GridPosition::new(7, 0, 3, 1), PALETTE[4]),
        NewBox::new("box-6", GridPosition::new(5, 1, 2, 1), PALETTE[5]),
    ]
}

/// Select box-2, drag it down, grow it from its handle, then click away.
fn script(config: &GridConfig, container_width: f64) -> Vec<Step> {
    let start = grid::absolute_bounds(config, container_width, &GridPosition::new(2, 0, 3, 2));
    let inside = Point::new(start.position.x + 20.0, start.position.y + 20.0);
    let row = config.cell_height + config.row_gap;
    let column = grid::cell_width(config, container_width) + config.column_gap;
    let corner = start.rect();

    let mut steps = vec![Step::Down(inside.x, inside.y), Step::Up, Step::Down(inside.x, inside.y)];
    steps.extend((1..=8).map(|i| Step::Move(inside.x, inside.y + row * 2.0 * f64::from(i) / 8.0)));
    steps.push(Step::Up);

    let handle = Point::new(corner.x1 - 5.0, corner.y1 + row * 2.0 - 5.0);
    steps.push(Step::Down(handle.x, handle.y));
    steps.push(Step::Move(handle.x + column, handle.y + row));
    steps.push(Step::Up);

    // Well below every box.
    steps.push(Step::Down(1.0, grid::container_height(config, 12) + 1.0));
    steps.push(Step::Up);
    steps
}

fn replay(store: &mut BoxStore, steps: &[Step], container_width: f64) -> StoreResult<()> {
    let mut interaction = Interaction::new();
    for step in steps {
        match *step {
            Step::Down(x, y) => interaction.pointer_down(store, Point::new(x, y), container_width)?,
            Step::Move(x, y) => interaction.pointer_move(store, Point::new(x, y), container_width)?,
            Step::Up => interaction.pointer_up(),
        }
        log::debug!("{:?} -> selected {:?}", step, store.selected_id());
    }
    // Every session ends with a terminal transition.
    interaction.release_selection(store, container_width)
}

fn main() {
    env_logger::init();
    log::info!("Starting GridSnap");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GridConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config: {}", e);
                return;
            }
        },
        None => GridConfig::default(),
    };
    let container_width = match args.next().map(|w| w.parse::<f64>()) {
        Some(Ok(width)) if width > config.total_column_gaps() => width,
        Some(_) => {
            log::error!("Container width must be a number wider than the column gaps");
            return;
        }
        None => DEFAULT_CONTAINER_WIDTH,
    };

    let mut store = BoxStore::with_boxes(config, demo_boxes());
    let steps = script(&config, container_width);
    if let Err(e) = replay(&mut store, &steps, container_width) {
        log::warn!("Session step ignored: {}", e);
    }

    let spawned = store.spawn_box();
    log::info!("Spawned {} at {:?}", spawned, store.get(&spawned).map(|b| b.grid_position));

    for grid_box in store.boxes() {
        let rect = grid_box.rect(&config, container_width);
        log::info!(
            "{} {:?} -> ({:.1}, {:.1}) {:.1}x{:.1}",
            grid_box.id(),
            grid_box.grid_position,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        );
    }
    log::info!("Rows needed: {}", store.rows_needed());

    match serde_json::to_string_pretty(&store.snapshot()) {
        Ok(json) => log::info!("Layout snapshot:\n{}", json),
        Err(e) => log::error!("Failed to serialize layout: {}", e),
    }
}
