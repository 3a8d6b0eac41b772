//! The mastery and weapon rank constant tables.

use serde::Serialize;

use super::{ByRank, Rank, RankCategory};

/// Numeric constants attached to one rank letter.
///
/// Weapon entries only carry `value` and `burst_mod`; the remaining fields
/// are zero for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    /// The rank this entry belongs to.
    pub rank: Rank,
    /// Flat value added to rolls (the `MR⋅X` / `WR⋅X` term).
    pub value: i64,
    /// Minimum d100 roll for a successful counter.
    pub counter_check: u32,
    /// Damage added by a successful counter.
    pub counter_dmg: i64,
    /// Extra dice granted to burst-style rolls.
    pub burst_mod: u32,
    /// Near-crit range on percentile dice.
    pub crit_range: u32,
    /// Movements granted by a haste surge.
    pub surge_haste: i64,
    /// Bonus granted by an inspire surge.
    pub surge_inspire: i64,
    /// Hit points of a summoned shield wall.
    pub sw_hp: i64,
}

/// Both rank tables, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct RankTable {
    mastery: [RankEntry; 6],
    weapon: [RankEntry; 6],
}

impl RankTable {
    /// The canonical Sphera constants.
    pub fn standard() -> Self {
        let value = ByRank::new([0, 10, 15, 25, 30, 40]);
        let counter_check = ByRank::new([40, 35, 30, 30, 25, 25]);
        let counter_dmg = ByRank::new([30, 30, 40, 40, 50, 50]);
        let burst_mod = ByRank::new([0, 1, 2, 3, 4, 5]);
        let surge_haste = ByRank::new([0, 2, 4, 6, 8, 10]);
        let surge_inspire = ByRank::new([0, 6, 12, 18, 24, 30]);
        let sw_hp = ByRank::new([10, 20, 30, 40, 50, 60]);

        let mastery = Rank::ALL.map(|rank| RankEntry {
            rank,
            value: value.get(rank),
            counter_check: counter_check.get(rank),
            counter_dmg: counter_dmg.get(rank),
            burst_mod: burst_mod.get(rank),
            crit_range: 80,
            surge_haste: surge_haste.get(rank),
            surge_inspire: surge_inspire.get(rank),
            sw_hp: sw_hp.get(rank),
        });
        let weapon = Rank::ALL.map(|rank| RankEntry {
            rank,
            value: value.get(rank),
            counter_check: 0,
            counter_dmg: 0,
            burst_mod: burst_mod.get(rank),
            crit_range: 0,
            surge_haste: 0,
            surge_inspire: 0,
            sw_hp: 0,
        });

        Self { mastery, weapon }
    }

    /// Look up a raw letter. Returns `None` for anything outside E..S.
    pub fn lookup(&self, letter: &str, category: RankCategory) -> Option<&RankEntry> {
        Rank::parse(letter).map(|rank| self.entry(rank, category))
    }

    /// The entry for an already-parsed rank.
    pub fn entry(&self, rank: Rank, category: RankCategory) -> &RankEntry {
        let table = match category {
            RankCategory::Mastery => &self.mastery,
            RankCategory::Weapon => &self.weapon,
        };
        &table[rank as usize]
    }

    /// All entries of one table, lowest rank first.
    pub fn entries(&self, category: RankCategory) -> &[RankEntry] {
        match category {
            RankCategory::Mastery => &self.mastery,
            RankCategory::Weapon => &self.weapon,
        }
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_resolves_in_both_tables() {
        let table = RankTable::standard();
        for letter in ["e", "d", "c", "b", "a", "s", "E", "D", "C", "B", "A", "S"] {
            assert!(table.lookup(letter, RankCategory::Mastery).is_some());
            assert!(table.lookup(letter, RankCategory::Weapon).is_some());
        }
    }

    #[test]
    fn anything_else_is_not_found() {
        let table = RankTable::standard();
        for letter in ["", "f", "z", "1", "bb", "ss"] {
            assert!(table.lookup(letter, RankCategory::Mastery).is_none());
            assert!(table.lookup(letter, RankCategory::Weapon).is_none());
        }
    }

    #[test]
    fn canonical_values() {
        let table = RankTable::standard();
        let b = table.lookup("b", RankCategory::Mastery).map(|e| e.value);
        assert_eq!(b, Some(25));
        let s = table.entry(Rank::S, RankCategory::Mastery);
        assert_eq!(s.value, 40);
        assert_eq!(s.counter_check, 25);
        assert_eq!(s.counter_dmg, 50);
        assert_eq!(table.entry(Rank::C, RankCategory::Weapon).value, 15);
        assert_eq!(table.entry(Rank::C, RankCategory::Weapon).counter_dmg, 0);
    }

    #[test]
    fn entries_in_rank_order() {
        let table = RankTable::standard();
        let ranks: Vec<Rank> = table
            .entries(RankCategory::Weapon)
            .iter()
            .map(|e| e.rank)
            .collect();
        assert_eq!(ranks, Rank::ALL.to_vec());
    }
}
