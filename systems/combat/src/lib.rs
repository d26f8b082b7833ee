#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Melee resolution and experience progression.
//!
//! [`resolve_attack`] is a calculator: it reports what a hit would do and
//! leaves both stat blocks untouched. Callers apply the damage themselves,
//! which lets previews and AI evaluation share the same arithmetic.

use delve_core::{AttackResult, CombatStats, RandomSource};
use tracing::trace;

/// Probability that an attack lands as a critical hit.
pub const CRITICAL_CHANCE: f64 = 0.1;

/// Multiplier applied to the attacker's attack on a critical hit.
pub const CRITICAL_MULTIPLIER: u32 = 2;

const BASE_LEVEL_THRESHOLD: u32 = 50;
const LEVEL_THRESHOLD_STEP: u32 = 30;
const LEVEL_UP_MAX_HP: u32 = 10;
const LEVEL_UP_ATTACK: u32 = 2;
const LEVEL_UP_DEFENSE: u32 = 1;

/// Resolves a single attack, consuming one value from `rng` for the critical roll.
pub fn resolve_attack<R: RandomSource>(
    attacker: &CombatStats,
    defender: &CombatStats,
    rng: &mut R,
) -> AttackResult {
    let is_critical = rng.chance(CRITICAL_CHANCE);
    let raw = if is_critical {
        attacker.attack.saturating_mul(CRITICAL_MULTIPLIER)
    } else {
        attacker.attack
    };
    let damage = raw.saturating_sub(defender.defense).max(1);
    let remaining_hp = defender.hp.saturating_sub(damage);

    let result = AttackResult {
        damage,
        is_critical,
        is_kill: defender.hp <= damage,
        remaining_hp,
    };
    trace!(
        damage = result.damage,
        critical = result.is_critical,
        kill = result.is_kill,
        "resolved attack"
    );
    result
}

/// Experience needed to advance from `level` to the next one.
#[must_use]
pub const fn xp_to_next_level(level: u32) -> u32 {
    BASE_LEVEL_THRESHOLD + LEVEL_THRESHOLD_STEP * level
}

/// Level and experience counters carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Progression {
    level: u32,
    xp: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self { level: 1, xp: 0 }
    }
}

impl Progression {
    /// Current experience level, starting at one.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated toward the next level.
    #[must_use]
    pub const fn xp(&self) -> u32 {
        self.xp
    }

    /// Experience still required for the next level.
    #[must_use]
    pub const fn xp_to_next(&self) -> u32 {
        xp_to_next_level(self.level)
    }

    /// Adds experience and applies at most one level-up to `stats`.
    ///
    /// Returns the new level when the threshold was reached. The threshold is
    /// subtracted from the pool, any surplus carries over, and health is
    /// refilled to the raised maximum.
    pub fn grant_xp(&mut self, amount: u32, stats: &mut CombatStats) -> Option<u32> {
        self.xp = self.xp.saturating_add(amount);
        let threshold = self.xp_to_next();
        if self.xp < threshold {
            return None;
        }

        self.xp -= threshold;
        self.level += 1;
        stats.max_hp += LEVEL_UP_MAX_HP;
        stats.hp = stats.max_hp;
        stats.attack += LEVEL_UP_ATTACK;
        stats.defense += LEVEL_UP_DEFENSE;
        Some(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{ScriptedRandom, SeededRandom};

    const ATTACKER: CombatStats = CombatStats::new(100, 10, 3);
    const DEFENDER: CombatStats = CombatStats::new(50, 5, 2);

    #[test]
    fn normal_hit_subtracts_defense() {
        let result = resolve_attack(&ATTACKER, &DEFENDER, &mut ScriptedRandom::new([0.5]));
        assert!(!result.is_critical);
        assert_eq!(result.damage, 8);
        assert_eq!(result.remaining_hp, 42);
        assert!(!result.is_kill);
    }

    #[test]
    fn critical_hit_doubles_attack() {
        let result = resolve_attack(&ATTACKER, &DEFENDER, &mut ScriptedRandom::new([0.05]));
        assert!(result.is_critical);
        assert_eq!(result.damage, 18);
    }

    #[test]
    fn heavy_armour_still_takes_one_damage() {
        let fortress = CombatStats::new(50, 5, 100);
        let result = resolve_attack(&ATTACKER, &fortress, &mut ScriptedRandom::new([0.5]));
        assert_eq!(result.damage, 1);
    }

    #[test]
    fn lethal_hit_clamps_remaining_hp() {
        let mut weak = CombatStats::new(50, 5, 0);
        weak.hp = 1;
        let result = resolve_attack(&ATTACKER, &weak, &mut ScriptedRandom::new([0.5]));
        assert!(result.is_kill);
        assert_eq!(result.remaining_hp, 0);
    }

    #[test]
    fn exact_lethal_damage_counts_as_kill() {
        let mut defender = DEFENDER;
        defender.hp = 8;
        let result = resolve_attack(&ATTACKER, &defender, &mut ScriptedRandom::new([0.5]));
        assert!(result.is_kill);
        assert_eq!(result.remaining_hp, 0);
    }

    #[test]
    fn resolution_leaves_inputs_untouched() {
        let attacker = ATTACKER;
        let defender = DEFENDER;
        let _ = resolve_attack(&attacker, &defender, &mut SeededRandom::from_seed(4));
        assert_eq!(attacker, ATTACKER);
        assert_eq!(defender, DEFENDER);
    }

    #[test]
    fn critical_rate_is_near_ten_percent() {
        let mut rng = SeededRandom::from_seed(2_024);
        let trials = 100_000;
        let criticals = (0..trials)
            .filter(|_| resolve_attack(&ATTACKER, &DEFENDER, &mut rng).is_critical)
            .count();
        let rate = criticals as f64 / f64::from(trials);
        assert!((0.09..0.11).contains(&rate), "critical rate {rate}");
    }

    #[test]
    fn level_thresholds_grow_linearly() {
        assert_eq!(xp_to_next_level(1), 80);
        assert_eq!(xp_to_next_level(2), 110);
        assert!(xp_to_next_level(1) < xp_to_next_level(5));
    }

    #[test]
    fn granting_xp_levels_up_once_and_carries_surplus() {
        let mut progression = Progression::default();
        let mut stats = CombatStats::new(100, 10, 3);
        stats.hp = 40;

        assert_eq!(progression.grant_xp(50, &mut stats), None);
        assert_eq!(progression.grant_xp(40, &mut stats), Some(2));
        assert_eq!(progression.level(), 2);
        assert_eq!(progression.xp(), 10);
        assert_eq!(stats, CombatStats::new(110, 12, 4));
        assert_eq!(progression.xp_to_next(), 110);
    }
}
