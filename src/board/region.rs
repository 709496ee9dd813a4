//! Region graph.
//!
//! A region is a placement slot a single unit can occupy: the army slot of a
//! land or coastal province, the fleet slot of a sea or coastal province, or
//! one fleet slot per coast of a split-coast province. Regions live in a
//! dense arena addressed by `RegionId`, so per-region data is stored in plain
//! vectors indexed by `RegionId::index()` instead of maps keyed by region.
//!
//! The standard graph is derived once from `ADJACENCIES` and shared through
//! the immutable `MAP` static.

use std::sync::LazyLock;

use super::adjacency::ADJACENCIES;
use super::order::{Location, OrderUnit};
use super::province::{Coast, Province, ALL_PROVINCES, PROVINCE_COUNT};
use super::unit::UnitType;

/// Dense index of a region in the map arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u16);

impl RegionId {
    /// Returns the arena index of this region.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A placement slot: province plus the unit type and coast that stand there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub province: Province,
    pub unit_type: UnitType,
    pub coast: Coast,
}

impl Region {
    /// Returns the board location of this region.
    pub fn location(&self) -> Location {
        Location::with_coast(self.province, self.coast)
    }

    /// Returns the order unit a unit standing in this region is written as.
    pub fn order_unit(&self) -> OrderUnit {
        OrderUnit {
            unit_type: self.unit_type,
            location: self.location(),
        }
    }

    /// True for one coast of a split-coast province.
    pub fn is_coast_variant(&self) -> bool {
        self.coast != Coast::None
    }
}

/// The region arena with adjacency lists.
#[derive(Debug, Clone)]
pub struct MapGraph {
    regions: Vec<Region>,
    adjacent: Vec<Vec<RegionId>>,
    by_province: Vec<Vec<RegionId>>,
}

/// The standard map, built on first use.
pub static MAP: LazyLock<MapGraph> = LazyLock::new(MapGraph::standard);

impl MapGraph {
    /// Builds the region graph of the standard map.
    pub fn standard() -> Self {
        let mut regions = Vec::with_capacity(128);
        let mut by_province = vec![Vec::new(); PROVINCE_COUNT];

        for &prov in ALL_PROVINCES.iter() {
            let mut push = |unit_type: UnitType, coast: Coast| {
                let id = RegionId(regions.len() as u16);
                regions.push(Region {
                    province: prov,
                    unit_type,
                    coast,
                });
                by_province[prov as usize].push(id);
            };
            if prov.is_land() {
                push(UnitType::Army, Coast::None);
            }
            if prov.is_navigable() {
                if prov.has_coasts() {
                    for &coast in prov.coasts() {
                        push(UnitType::Fleet, coast);
                    }
                } else {
                    push(UnitType::Fleet, Coast::None);
                }
            }
        }

        let mut graph = MapGraph {
            adjacent: vec![Vec::new(); regions.len()],
            regions,
            by_province,
        };

        for adj in ADJACENCIES.iter() {
            if adj.army_ok {
                graph.link(
                    graph.find(adj.from, UnitType::Army, Coast::None),
                    graph.find(adj.to, UnitType::Army, Coast::None),
                );
            }
            if adj.fleet_ok {
                graph.link(
                    graph.find(adj.from, UnitType::Fleet, adj.from_coast),
                    graph.find(adj.to, UnitType::Fleet, adj.to_coast),
                );
            }
        }

        graph
    }

    fn link(&mut self, from: Option<RegionId>, to: Option<RegionId>) {
        if let (Some(from), Some(to)) = (from, to) {
            let list = &mut self.adjacent[from.index()];
            if !list.contains(&to) {
                list.push(to);
            }
        }
    }

    /// Number of regions in the arena.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True if the arena holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates every region id in arena order.
    pub fn ids(&self) -> impl Iterator<Item = RegionId> {
        (0..self.regions.len() as u16).map(RegionId)
    }

    #[inline]
    pub fn region(&self, id: RegionId) -> Region {
        self.regions[id.index()]
    }

    #[inline]
    pub fn province(&self, id: RegionId) -> Province {
        self.regions[id.index()].province
    }

    /// Regions one move away from `id`.
    #[inline]
    pub fn adjacent(&self, id: RegionId) -> &[RegionId] {
        &self.adjacent[id.index()]
    }

    /// Every region belonging to the province.
    #[inline]
    pub fn regions_of(&self, prov: Province) -> &[RegionId] {
        &self.by_province[prov as usize]
    }

    /// Looks up the region a unit of `unit_type` occupies at `prov`/`coast`.
    ///
    /// Fleets on split-coast provinces need a coast; every other unit must
    /// use `Coast::None`. Returns None for impossible placements.
    pub fn find(&self, prov: Province, unit_type: UnitType, coast: Coast) -> Option<RegionId> {
        self.by_province[prov as usize]
            .iter()
            .copied()
            .find(|&id| {
                let r = self.regions[id.index()];
                r.unit_type == unit_type && r.coast == coast
            })
    }

    /// True if `to` is one move from `from`.
    pub fn is_adjacent(&self, from: RegionId, to: RegionId) -> bool {
        self.adjacent[from.index()].contains(&to)
    }

    /// True if a unit in `from` can move into some region of `prov`.
    pub fn reaches(&self, from: RegionId, prov: Province) -> bool {
        self.adjacent[from.index()]
            .iter()
            .any(|&r| self.regions[r.index()].province == prov)
    }

    /// True if some region of `prov` is adjacent to `unit`.
    pub fn touches(&self, prov: Province, unit: RegionId) -> bool {
        self.by_province[prov as usize]
            .iter()
            .any(|&r| self.adjacent[r.index()].contains(&unit))
    }
}
