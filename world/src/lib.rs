#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for a Delve run.
//!
//! The world owns the current floor, the player, the enemies and every item
//! lying around. Adapters drive it exclusively through [`apply`], which
//! resolves one whole turn (player action, enemy reactions, visibility
//! refresh) and reports the outcome as [`Event`] values. Read access goes
//! through the [`query`] module.

mod config;
mod entities;

use delve_core::{
    CellCoord, Combatant, Command, Direction, DungeonLayout, EnemyId, Event, InventoryItem,
    ItemEffect, ItemId, ItemKind, SeededRandom,
};
use delve_system_combat::resolve_attack;
use delve_system_dungeon_generation::generate;
use delve_system_loot::LootTable;
use delve_system_pursuit::{decide, Intent, Pursuer};
use delve_system_spawning::populate;
use delve_system_visibility::{update_visibility, VisibilityGrid};
use tracing::{debug, info, trace, warn};

pub use config::{ConfigError, FloorParams, FloorScaling, GameConfig};
pub use entities::{Enemy, FloorItem, Player};

const FIRST_FLOOR: u32 = 1;

/// Represents the authoritative state of a single run.
#[derive(Clone, Debug)]
pub struct World {
    fov_radius: u32,
    enemy_path_budget: u32,
    scaling: FloorScaling,
    loot: LootTable,
    rng: SeededRandom,
    floor: u32,
    layout: DungeonLayout,
    visibility: VisibilityGrid,
    player: Player,
    enemies: Vec<Enemy>,
    items: Vec<FloorItem>,
    next_enemy_id: u32,
    next_item_id: u64,
    turn: u64,
    game_over: bool,
}

impl World {
    /// Validates the configuration and enters the first floor.
    ///
    /// The events describing the first floor are appended to `out_events`.
    pub fn new(config: &GameConfig, out_events: &mut Vec<Event>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = SeededRandom::from_seed(config.seed);
        let layout = build_layout(&config.scaling, FIRST_FLOOR, &mut rng);
        let start = start_cell(&layout);
        let mut world = Self {
            fov_radius: config.fov_radius,
            enemy_path_budget: config.enemy_path_budget,
            scaling: config.scaling.clone(),
            loot: config.loot_table(),
            rng,
            floor: FIRST_FLOOR,
            visibility: VisibilityGrid::for_grid(layout.grid()),
            layout,
            player: Player::new(start),
            enemies: Vec::new(),
            items: Vec::new(),
            next_enemy_id: 0,
            next_item_id: 0,
            turn: 0,
            game_over: false,
        };
        info!(seed = config.seed, "starting run");
        world.stock_floor(out_events);
        Ok(world)
    }

    fn stock_floor(&mut self, out_events: &mut Vec<Event>) {
        self.visibility = VisibilityGrid::for_grid(self.layout.grid());
        self.player.cell = start_cell(&self.layout);

        let density = self.scaling.params_for(self.floor).density;
        let population = populate(&self.layout, self.floor, &density, &self.loot, &mut self.rng);
        self.enemies = population
            .enemies
            .into_iter()
            .map(|spawn| {
                let id = EnemyId::new(self.next_enemy_id);
                self.next_enemy_id += 1;
                Enemy::spawn(id, spawn.kind, self.floor, spawn.cell)
            })
            .collect();
        self.items = population
            .items
            .into_iter()
            .map(|spawn| FloorItem {
                kind: spawn.kind,
                cell: spawn.cell,
            })
            .collect();

        info!(
            floor = self.floor,
            rooms = self.layout.rooms().len(),
            enemies = self.enemies.len(),
            items = self.items.len(),
            "entered floor"
        );
        out_events.push(Event::FloorEntered {
            floor: self.floor,
            width: self.layout.width(),
            height: self.layout.height(),
        });
        self.refresh_visibility(out_events);
        self.emit_status(out_events);
        message(out_events, format!("--- Floor {} ---", self.floor));
    }

    fn descend(&mut self, out_events: &mut Vec<Event>) {
        self.floor += 1;
        message(
            out_events,
            format!("Descending to floor {}...", self.floor),
        );
        self.layout = build_layout(&self.scaling, self.floor, &mut self.rng);
        self.stock_floor(out_events);
    }

    fn enemy_index_at(&self, cell: CellCoord) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.cell == cell)
    }

    fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId::new(self.next_item_id);
        self.next_item_id += 1;
        id
    }

    fn player_turn(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let target = self.player.cell.step(direction);

        if let Some(index) = target.and_then(|cell| self.enemy_index_at(cell)) {
            self.attack_enemy(index, out_events);
        } else if let Some(cell) = target.filter(|cell| self.layout.grid().can_move_to(*cell)) {
            self.player.cell = cell;
            self.pick_up_items(out_events);
            if self.layout.stairs_down() == Some(cell) {
                self.descend(out_events);
                return;
            }
        }

        self.react_enemies(out_events);
        self.refresh_visibility(out_events);
        self.emit_status(out_events);
    }

    fn attack_enemy(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let result = resolve_attack(
            &self.player.stats,
            &self.enemies[index].stats,
            &mut self.rng,
        );
        let enemy = &mut self.enemies[index];
        let _ = enemy.stats.take_damage(result.damage);
        out_events.push(Event::AttackResolved {
            attacker: Combatant::Player,
            defender: Combatant::Enemy(enemy.id),
            result,
        });
        let critical = if result.is_critical { " CRITICAL!" } else { "" };
        message(
            out_events,
            format!(
                "You hit {} for {} damage!{critical}",
                enemy.name, result.damage
            ),
        );

        if enemy.stats.is_alive() {
            return;
        }

        let enemy = self.enemies.remove(index);
        debug!(enemy = enemy.id.get(), kind = ?enemy.kind, "enemy defeated");
        out_events.push(Event::EnemyDefeated {
            enemy: enemy.id,
            kind: enemy.kind,
            cell: enemy.cell,
        });
        message(out_events, format!("{} defeated!", enemy.name));
        self.player.kills += 1;

        if let Some(level) = self
            .player
            .progression
            .grant_xp(enemy.xp_reward, &mut self.player.stats)
        {
            info!(level, "player levelled up");
            out_events.push(Event::LevelUp { level });
            message(out_events, format!("Level up! You are now level {level}!"));
        }

        if let Some(kind) = self.loot.roll(self.floor, &mut self.rng) {
            self.items.push(FloorItem {
                kind,
                cell: enemy.cell,
            });
            out_events.push(Event::LootDropped {
                kind,
                cell: enemy.cell,
            });
        }
    }

    fn pick_up_items(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.player.cell;
        let mut index = 0;
        while index < self.items.len() {
            let item = self.items[index];
            if item.cell == cell && self.collect(item.kind, out_events) {
                let _ = self.items.remove(index);
            } else {
                index += 1;
            }
        }
    }

    /// Applies a floor item to the player. Returns `false` when it stays on the floor.
    fn collect(&mut self, kind: ItemKind, out_events: &mut Vec<Event>) -> bool {
        let definition = kind.definition();
        match definition.effect {
            ItemEffect::Gold { amount } => {
                self.player.gold += amount;
                message(
                    out_events,
                    format!("Picked up {} (+{amount} gold)", definition.name),
                );
                true
            }
            ItemEffect::Heal { .. } => {
                let item = InventoryItem::from_kind(self.allocate_item_id(), kind);
                match self.player.inventory.add_item(item) {
                    Ok(_) => {
                        message(out_events, format!("Picked up {}", definition.name));
                        true
                    }
                    Err(error) => {
                        debug!(%error, "potion left on the floor");
                        message(out_events, "Inventory full!".to_owned());
                        false
                    }
                }
            }
            ItemEffect::Weapon { attack } => {
                let current = self.player.weapon.map_or(0, weapon_attack);
                if attack <= current {
                    message(
                        out_events,
                        format!("{} is weaker than current weapon", definition.name),
                    );
                    return false;
                }

                self.player.stats.attack = self.player.stats.attack - current + attack;
                self.player.weapon = Some(kind);
                message(
                    out_events,
                    format!("Equipped {}! (ATK +{attack})", definition.name),
                );
                true
            }
        }
    }

    fn react_enemies(&mut self, out_events: &mut Vec<Event>) {
        for index in 0..self.enemies.len() {
            let enemy = &self.enemies[index];
            let pursuer = Pursuer {
                cell: enemy.cell,
                detection_range: enemy.detection_range,
                uses_pathfinding: enemy.uses_pathfinding,
            };
            let enemies = &self.enemies;
            let intent = decide(
                self.layout.grid(),
                &pursuer,
                self.player.cell,
                self.enemy_path_budget,
                |cell| {
                    enemies
                        .iter()
                        .enumerate()
                        .any(|(other, enemy)| other != index && enemy.cell == cell)
                },
            );

            match intent {
                Intent::Hold => {}
                Intent::Step(cell) => {
                    trace!(enemy = self.enemies[index].id.get(), ?cell, "enemy stepped");
                    self.enemies[index].cell = cell;
                }
                Intent::Attack => {
                    let enemy = &self.enemies[index];
                    let result = resolve_attack(&enemy.stats, &self.player.stats, &mut self.rng);
                    let _ = self.player.stats.take_damage(result.damage);
                    out_events.push(Event::AttackResolved {
                        attacker: Combatant::Enemy(enemy.id),
                        defender: Combatant::Player,
                        result,
                    });
                    message(
                        out_events,
                        format!("{} hits you for {} damage!", enemy.name, result.damage),
                    );

                    if !self.player.stats.is_alive() {
                        let summary = self.player.summary(self.floor);
                        info!(?summary, "player died");
                        self.game_over = true;
                        out_events.push(Event::PlayerDied { summary });
                        return;
                    }
                }
            }
        }
    }

    fn use_item(&mut self, slot: usize, out_events: &mut Vec<Event>) {
        let Some(item) = self.player.inventory.get(slot).cloned() else {
            return;
        };

        let ItemEffect::Heal { amount } = item.kind.definition().effect else {
            return;
        };

        let healed = self.player.stats.heal(amount);
        if healed == 0 {
            message(out_events, "Already at full health!".to_owned());
            return;
        }

        let _ = self.player.inventory.use_item(item.id);
        message(
            out_events,
            format!("Used {}. Restored {healed} HP.", item.name),
        );
        out_events.push(Event::InventoryChanged {
            items: self.player.inventory.items().to_vec(),
        });
        out_events.push(Event::HpChanged {
            hp: self.player.stats.hp,
            max_hp: self.player.stats.max_hp,
        });
    }

    fn refresh_visibility(&mut self, out_events: &mut Vec<Event>) {
        update_visibility(
            self.layout.grid(),
            &mut self.visibility,
            self.player.cell,
            self.fov_radius,
        );
        out_events.push(Event::VisibilityRefreshed {
            origin: self.player.cell,
        });
    }

    fn emit_status(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::HpChanged {
            hp: self.player.stats.hp,
            max_hp: self.player.stats.max_hp,
        });
        out_events.push(Event::StatsChanged {
            level: self.player.progression.level(),
            gold: self.player.gold,
        });
        out_events.push(Event::InventoryChanged {
            items: self.player.inventory.items().to_vec(),
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands received after the player died are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.game_over {
        return;
    }

    world.turn += 1;
    match command {
        Command::Move { direction } => world.player_turn(direction, out_events),
        Command::UseItem { slot } => world.use_item(slot, out_events),
    }
}

fn build_layout(scaling: &FloorScaling, floor: u32, rng: &mut SeededRandom) -> DungeonLayout {
    generate(&scaling.params_for(floor).dungeon, rng)
}

fn start_cell(layout: &DungeonLayout) -> CellCoord {
    layout.player_start().unwrap_or_else(|| {
        warn!("floor has no rooms; placing player at the grid centre");
        CellCoord::new(layout.width() / 2, layout.height() / 2)
    })
}

fn weapon_attack(kind: ItemKind) -> u32 {
    match kind.definition().effect {
        ItemEffect::Weapon { attack } => attack,
        ItemEffect::Heal { .. } | ItemEffect::Gold { .. } => 0,
    }
}

fn message(out_events: &mut Vec<Event>, text: String) {
    out_events.push(Event::Message { text });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use delve_core::{CellCoord, DungeonLayout, RunSummary};
    use delve_system_visibility::VisibilityGrid;

    use super::{Enemy, FloorItem, Player, World};

    /// One-based number of the current floor.
    #[must_use]
    pub fn floor(world: &World) -> u32 {
        world.floor
    }

    /// Layout of the current floor.
    #[must_use]
    pub fn layout(world: &World) -> &DungeonLayout {
        &world.layout
    }

    /// Fog-of-war state of the current floor.
    #[must_use]
    pub fn visibility(world: &World) -> &VisibilityGrid {
        &world.visibility
    }

    /// The player character.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Living enemies in reaction order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Enemy standing on the cell, if any.
    #[must_use]
    pub fn enemy_at(world: &World, cell: CellCoord) -> Option<&Enemy> {
        world.enemies.iter().find(|enemy| enemy.cell == cell)
    }

    /// Items lying on the current floor.
    #[must_use]
    pub fn items(world: &World) -> &[FloorItem] {
        &world.items
    }

    /// Number of commands applied so far.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Whether the player has died.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Totals for the run so far.
    #[must_use]
    pub fn summary(world: &World) -> RunSummary {
        world.player.summary(world.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{CombatStats, EnemyKind, Room, RoomSize, TileGrid};

    fn arena() -> DungeonLayout {
        let grid = TileGrid::from_ascii(
            "############
             #..........#
             #..........#
             #..........#
             #..........#
             ############",
        );
        let rooms = vec![
            Room::from_origin_and_size(CellCoord::new(1, 1), RoomSize::new(3, 3)),
            Room::from_origin_and_size(CellCoord::new(8, 1), RoomSize::new(3, 3)),
        ];
        DungeonLayout::new(grid, rooms)
    }

    fn world_in(layout: DungeonLayout, player: CellCoord) -> World {
        let config = GameConfig::default();
        World {
            fov_radius: config.fov_radius,
            enemy_path_budget: config.enemy_path_budget,
            scaling: config.scaling.clone(),
            loot: config.loot_table(),
            rng: SeededRandom::from_seed(1),
            floor: 1,
            visibility: VisibilityGrid::for_grid(layout.grid()),
            layout,
            player: Player::new(player),
            enemies: Vec::new(),
            items: Vec::new(),
            next_enemy_id: 0,
            next_item_id: 0,
            turn: 0,
            game_over: false,
        }
    }

    fn add_enemy(world: &mut World, kind: EnemyKind, cell: CellCoord) -> EnemyId {
        let id = EnemyId::new(world.next_enemy_id);
        world.next_enemy_id += 1;
        world.enemies.push(Enemy::spawn(id, kind, world.floor, cell));
        id
    }

    fn messages(events: &[Event]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::Message { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn step(world: &mut World, direction: Direction) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Move { direction }, &mut events);
        events
    }

    #[test]
    fn walking_into_a_wall_keeps_position() {
        let mut world = world_in(arena(), CellCoord::new(1, 1));
        let events = step(&mut world, Direction::North);
        assert_eq!(world.player.cell, CellCoord::new(1, 1));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::VisibilityRefreshed { .. })));
        assert_eq!(query::turn(&world), 1);
    }

    #[test]
    fn bumping_an_enemy_attacks_instead_of_moving() {
        let mut world = world_in(arena(), CellCoord::new(4, 2));
        let id = add_enemy(&mut world, EnemyKind::Skeleton, CellCoord::new(5, 2));
        world.enemies[0].stats = CombatStats::new(500, 0, 0);

        let events = step(&mut world, Direction::East);
        assert_eq!(world.player.cell, CellCoord::new(4, 2));
        assert!(events.iter().any(|event| matches!(
            event,
            Event::AttackResolved {
                attacker: Combatant::Player,
                defender: Combatant::Enemy(defender),
                ..
            } if *defender == id
        )));
        assert!(world.enemies[0].stats.hp < 500);
    }

    #[test]
    fn killing_an_enemy_grants_xp_and_counts() {
        let mut world = world_in(arena(), CellCoord::new(4, 2));
        let _ = add_enemy(&mut world, EnemyKind::Slime, CellCoord::new(5, 2));
        world.enemies[0].stats.hp = 1;
        let reward = world.enemies[0].xp_reward;

        let events = step(&mut world, Direction::East);
        assert!(world.enemies.is_empty());
        assert_eq!(world.player.kills, 1);
        assert_eq!(world.player.progression.xp(), reward);
        assert!(messages(&events).contains(&"Slime defeated!"));
        let dropped = events.iter().any(|event| matches!(event, Event::LootDropped { .. }));
        assert_eq!(dropped, !world.items.is_empty());
    }

    #[test]
    fn gold_is_collected_on_arrival() {
        let mut world = world_in(arena(), CellCoord::new(4, 2));
        world.items.push(FloorItem {
            kind: ItemKind::Gemstone,
            cell: CellCoord::new(5, 2),
        });

        let events = step(&mut world, Direction::East);
        assert_eq!(world.player.gold, 100);
        assert!(world.items.is_empty());
        assert!(messages(&events).contains(&"Picked up Gemstone (+100 gold)"));
        assert!(events
            .iter()
            .any(|event| *event == Event::StatsChanged { level: 1, gold: 100 }));
    }

    #[test]
    fn weapons_equip_only_when_stronger() {
        let mut world = world_in(arena(), CellCoord::new(4, 2));
        world.items.push(FloorItem {
            kind: ItemKind::IronSword,
            cell: CellCoord::new(5, 2),
        });
        world.items.push(FloorItem {
            kind: ItemKind::RustySword,
            cell: CellCoord::new(6, 2),
        });

        let _ = step(&mut world, Direction::East);
        assert_eq!(world.player.weapon, Some(ItemKind::IronSword));
        assert_eq!(world.player.stats.attack, 16);

        let events = step(&mut world, Direction::East);
        assert_eq!(world.player.stats.attack, 16);
        assert_eq!(world.items.len(), 1);
        assert!(messages(&events).contains(&"Rusty Sword is weaker than current weapon"));
    }

    #[test]
    fn potions_stay_on_the_floor_when_inventory_is_full() {
        let mut world = world_in(arena(), CellCoord::new(4, 2));
        for id in 0..10 {
            let sword = InventoryItem::from_kind(ItemId::new(100 + id), ItemKind::RustySword);
            assert!(world.player.inventory.add_item(sword).is_ok());
        }
        world.items.push(FloorItem {
            kind: ItemKind::HealthPotion,
            cell: CellCoord::new(5, 2),
        });

        let events = step(&mut world, Direction::East);
        assert_eq!(world.items.len(), 1);
        assert!(messages(&events).contains(&"Inventory full!"));
    }

    #[test]
    fn potions_heal_and_are_consumed() {
        let mut world = world_in(arena(), CellCoord::new(4, 2));
        let potion = InventoryItem::from_kind(ItemId::new(9), ItemKind::HealthPotion);
        assert!(world.player.inventory.add_item(potion).is_ok());

        let mut events = Vec::new();
        apply(&mut world, Command::UseItem { slot: 0 }, &mut events);
        assert!(messages(&events).contains(&"Already at full health!"));
        assert_eq!(world.player.inventory.len(), 1);

        world.player.stats.hp = 50;
        events.clear();
        apply(&mut world, Command::UseItem { slot: 0 }, &mut events);
        assert_eq!(world.player.stats.hp, 80);
        assert!(world.player.inventory.is_empty());
        assert!(messages(&events).contains(&"Used Health Potion. Restored 30 HP."));

        events.clear();
        apply(&mut world, Command::UseItem { slot: 3 }, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn adjacent_enemies_strike_back() {
        let mut world = world_in(arena(), CellCoord::new(2, 2));
        let _ = add_enemy(&mut world, EnemyKind::Bat, CellCoord::new(4, 2));
        world.enemies[0].stats.hp = 500;

        let events = step(&mut world, Direction::East);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::AttackResolved {
                defender: Combatant::Player,
                ..
            }
        )));
        assert!(world.player.stats.hp < 100);
    }

    #[test]
    fn distant_enemies_close_in() {
        let mut world = world_in(arena(), CellCoord::new(1, 2));
        let _ = add_enemy(&mut world, EnemyKind::Slime, CellCoord::new(5, 2));

        let _ = step(&mut world, Direction::South);
        assert_eq!(world.enemies[0].cell, CellCoord::new(5, 2));

        let _ = step(&mut world, Direction::East);
        assert_eq!(world.enemies[0].cell, CellCoord::new(4, 2));
    }

    #[test]
    fn enemies_never_share_a_cell() {
        let mut world = world_in(arena(), CellCoord::new(1, 1));
        let _ = add_enemy(&mut world, EnemyKind::Slime, CellCoord::new(3, 1));
        let _ = add_enemy(&mut world, EnemyKind::Slime, CellCoord::new(4, 1));
        world.player.stats = CombatStats::new(10_000, 0, 0);

        for _ in 0..6 {
            let _ = step(&mut world, Direction::West);
            assert_ne!(world.enemies[0].cell, world.enemies[1].cell);
        }
    }

    #[test]
    fn death_ends_the_run() {
        let mut world = world_in(arena(), CellCoord::new(1, 2));
        let _ = add_enemy(&mut world, EnemyKind::Skeleton, CellCoord::new(2, 2));
        world.enemies[0].stats = CombatStats::new(500, 500, 0);
        world.player.stats.hp = 1;

        let events = step(&mut world, Direction::West);
        assert!(query::is_game_over(&world));
        assert!(events.iter().any(|event| matches!(
            event,
            Event::PlayerDied { summary } if summary.floor == 1 && summary.level == 1
        )));

        let mut later = Vec::new();
        apply(&mut world, Command::Move { direction: Direction::South }, &mut later);
        assert!(later.is_empty());
    }

    #[test]
    fn stairs_lead_to_a_fresh_floor() {
        let layout = arena();
        let stairs = layout.stairs_down().expect("stairs");
        let mut world = world_in(layout, CellCoord::new(stairs.column() - 1, stairs.row()));

        let events = step(&mut world, Direction::East);
        assert_eq!(query::floor(&world), 2);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::FloorEntered { floor: 2, .. })));
        assert!(messages(&events).contains(&"Descending to floor 2..."));
        assert_eq!(Some(world.player.cell), world.layout.player_start());
    }
}
