//! Plain-text view of the grid
//!
//! Read-only: rendering never touches cell contents.

use std::fmt::Write;

use crate::grid::CellKind;
use crate::simulation::world::World;

pub fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => '.',
        CellKind::Treasure => 'T',
        CellKind::Hunter => 'H',
        CellKind::Knight => 'K',
        CellKind::Hideout => 'O',
        CellKind::Garrison => 'G',
    }
}

/// One line per row (x), one character per column (y)
pub fn render_ascii(world: &World) -> String {
    let size = world.grid.size();
    let mut out = String::with_capacity(((size + 1) * size) as usize);
    for x in 0..size {
        for y in 0..size {
            out.push(glyph(world.grid.get_cell(x, y).kind()));
        }
        out.push('\n');
    }
    out
}

/// Grid plus a one-line status header
pub fn render_frame(world: &World) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "step {} | hunters {} | knights {} | treasures {} | stored {}",
        world.current_step,
        world.living_hunters(),
        world.knights.len(),
        world.outstanding_treasures(),
        world.stored_treasure_count()
    );
    out.push_str(&render_ascii(world));
    out
}
