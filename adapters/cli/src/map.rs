//! ASCII rendering of the explored part of the current floor.

use delve_core::{CellCoord, EnemyKind, ItemEffect, ItemKind, Tile};
use delve_system_visibility::Visibility;
use delve_world::{query, World};

/// Renders one line per grid row.
///
/// Hidden cells are blank. Remembered floor is drawn as `,` and floor in view
/// as `.`. Enemies and items only appear while in view; the stairs stay drawn
/// once seen.
pub(crate) fn render(world: &World) -> String {
    let layout = query::layout(world);
    let visibility = query::visibility(world);
    let player = query::player(world).cell();
    let stairs = layout.stairs_down();

    let mut out = String::with_capacity(((layout.width() + 1) * layout.height()) as usize);
    for row in 0..layout.height() {
        for column in 0..layout.width() {
            let cell = CellCoord::new(column, row);
            out.push(glyph(world, cell, player, stairs, visibility.get(cell)));
        }
        out.push('\n');
    }
    out
}

fn glyph(
    world: &World,
    cell: CellCoord,
    player: CellCoord,
    stairs: Option<CellCoord>,
    visibility: Visibility,
) -> char {
    if cell == player {
        return '@';
    }

    let tile = query::layout(world).grid().tile(cell);
    match visibility {
        Visibility::Hidden => ' ',
        Visibility::Seen if stairs == Some(cell) => '>',
        Visibility::Seen => terrain(tile, ','),
        Visibility::Visible => {
            if let Some(enemy) = query::enemy_at(world, cell) {
                return enemy_glyph(enemy.kind());
            }
            if let Some(item) = query::items(world).iter().find(|item| item.cell == cell) {
                return item_glyph(item.kind);
            }
            if stairs == Some(cell) {
                return '>';
            }
            terrain(tile, '.')
        }
    }
}

fn terrain(tile: Option<Tile>, floor: char) -> char {
    match tile {
        Some(Tile::Floor) => floor,
        Some(Tile::Wall) => '#',
        None => ' ',
    }
}

const fn enemy_glyph(kind: EnemyKind) -> char {
    match kind {
        EnemyKind::Slime => 's',
        EnemyKind::Bat => 'b',
        EnemyKind::Skeleton => 'k',
    }
}

const fn item_glyph(kind: ItemKind) -> char {
    match kind.definition().effect {
        ItemEffect::Heal { .. } => '!',
        ItemEffect::Weapon { .. } => '/',
        ItemEffect::Gold { .. } => '$',
    }
}
