//! Single-phase order planner.
//!
//! Each call builds a fresh `PhaseContext` from the board snapshot:
//! supply-center values, proximity rings, strength/competition counts and
//! finally one destination value per region. The phase planner then picks
//! orders with a value-biased random walk, and in movement phases the
//! post-pass turns wasted holds into supports.
//!
//! Nothing survives between calls; the same snapshot, configuration and
//! seed always produce the same orders.

pub mod adjustment;
pub mod commitments;
pub mod contest;
pub mod destination;
pub mod movement;
pub mod postpass;
pub mod proximity;
pub mod retreat;
pub mod select;
pub mod value;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::board::{
    BoardState, Coast, MapGraph, Order, Phase, Power, Province, ProvinceSet, RegionId, UnitType,
    ALL_POWERS, MAP, PROVINCE_COUNT,
};
use crate::config::{ConfigError, PhaseWeights, PlannerConfig};
use crate::protocol::format_order;

pub use commitments::Commitments;
use contest::Contest;
use destination::DestinationValues;
use proximity::ProximityField;
use value::ValueModel;

/// Errors raised while planning.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{unit_type:?} at {province} stands on impassable terrain")]
    UnitOnImpassable { province: Province, unit_type: UnitType },

    #[error("fleet at {province} needs a coast")]
    MissingCoast { province: Province },

    #[error("coast {coast:?} is not valid for {unit_type:?} at {province}")]
    InvalidCoast {
        province: Province,
        unit_type: UnitType,
        coast: Coast,
    },

    #[error("committed order '{order}' is not available to {power} this phase")]
    ForeignCommitment { order: String, power: Power },

    #[error("more than one committed order for the unit at {0}")]
    DuplicateCommitment(Province),

    #[error("committed order '{0}' does not name a unit on the board")]
    UnownedCommitment(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PlanError {
    pub(crate) fn foreign(order: &Order, power: Power) -> Self {
        PlanError::ForeignCommitment {
            order: format_order(order),
            power,
        }
    }
}

/// A unit on the board together with the region it stands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedUnit {
    pub power: Power,
    pub region: RegionId,
}

/// Resolves a unit placement to its region.
pub fn locate(
    map: &MapGraph,
    province: Province,
    unit_type: UnitType,
    coast: Coast,
) -> Result<RegionId, PlanError> {
    if let Some(r) = map.find(province, unit_type, coast) {
        return Ok(r);
    }
    let passable = match unit_type {
        UnitType::Army => province.is_land(),
        UnitType::Fleet => province.is_navigable(),
    };
    if !passable {
        Err(PlanError::UnitOnImpassable { province, unit_type })
    } else if unit_type == UnitType::Fleet && province.has_coasts() && coast == Coast::None {
        Err(PlanError::MissingCoast { province })
    } else {
        Err(PlanError::InvalidCoast {
            province,
            unit_type,
            coast,
        })
    }
}

/// Resolves every unit on the board to its region, in province order.
pub fn locate_all(map: &MapGraph, state: &BoardState) -> Result<Vec<PlacedUnit>, PlanError> {
    state
        .all_units()
        .map(|u| {
            Ok(PlacedUnit {
                power: u.power,
                region: locate(map, u.province, u.unit_type, u.coast)?,
            })
        })
        .collect()
}

/// Everything derived from one snapshot for one power.
pub struct PhaseContext<'a> {
    pub power: Power,
    pub state: &'a BoardState,
    pub map: &'static MapGraph,
    pub config: &'a PlannerConfig,
    pub weights: &'a PhaseWeights,
    pub values: ValueModel,
    pub proximity: ProximityField,
    pub contest: Contest,
    pub destination: DestinationValues,
    /// Provinces no planned order may enter.
    pub blocked: &'a ProvinceSet,
    /// The planning power's units, in province order.
    pub units: Vec<RegionId>,
    region_at: [Option<RegionId>; PROVINCE_COUNT],
}

impl<'a> PhaseContext<'a> {
    pub fn new(
        power: Power,
        state: &'a BoardState,
        config: &'a PlannerConfig,
        blocked: &'a ProvinceSet,
    ) -> Result<Self, PlanError> {
        let map: &'static MapGraph = &MAP;
        let placed = locate_all(map, state)?;

        let mut region_at = [None; PROVINCE_COUNT];
        for u in &placed {
            region_at[map.province(u.region) as usize] = Some(u.region);
        }
        let units = placed
            .iter()
            .filter(|u| u.power == power)
            .map(|u| u.region)
            .collect();

        let weights = config.weights_for(state.season, state.phase, state.adjustment(power));
        let values = ValueModel::compute(power, state, map, &placed);
        let proximity = ProximityField::compute(map, &values, weights, config.decay);
        let contest = Contest::compute(power, map, &placed);
        let destination = match state.phase {
            Phase::Build => DestinationValues::adjustment(map, &proximity, &values, weights),
            Phase::Movement | Phase::Retreat => {
                DestinationValues::movement(map, &proximity, &contest, weights)
            }
        };

        Ok(PhaseContext {
            power,
            state,
            map,
            config,
            weights,
            values,
            proximity,
            contest,
            destination,
            blocked,
            units,
            region_at,
        })
    }

    /// Destination value of a region.
    #[inline]
    pub fn value(&self, region: RegionId) -> i64 {
        self.destination.get(region)
    }

    /// Region of the planning power's unit in `prov`, if it has one there.
    pub fn own_unit_at(&self, prov: Province) -> Option<RegionId> {
        match self.state.units[prov as usize] {
            Some((p, _)) if p == self.power => self.region_at[prov as usize],
            _ => None,
        }
    }
}

/// Orders placed so far for the planning power, keyed by origin province.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    committed: Vec<bool>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a committed order; the post-pass never rewrites it.
    pub fn commit(&mut self, order: Order) {
        self.orders.push(order);
        self.committed.push(true);
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
        self.committed.push(false);
    }

    fn position(&self, prov: Province) -> Option<usize> {
        self.orders.iter().position(|o| o.origin() == Some(prov))
    }

    /// First order issued to the unit in `prov`.
    pub fn order_at(&self, prov: Province) -> Option<&Order> {
        self.position(prov).map(|i| &self.orders[i])
    }

    /// First Move whose destination is `prov`.
    pub fn move_into(&self, prov: Province) -> Option<&Order> {
        self.orders
            .iter()
            .find(|o| o.is_move() && o.destination() == Some(prov))
    }

    /// Replaces the planned (not committed) order of the unit in `prov`.
    pub fn replace(&mut self, prov: Province, order: Order) -> bool {
        match self.position(prov) {
            Some(i) if !self.committed[i] => {
                self.orders[i] = order;
                true
            }
            _ => false,
        }
    }

    pub fn is_committed(&self, prov: Province) -> bool {
        self.position(prov).is_some_and(|i| self.committed[i])
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn into_orders(self) -> Vec<Order> {
        self.orders
    }
}

/// Configured planner. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
    commitments: Commitments,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Planner {
            config,
            commitments: Commitments::default(),
        }
    }

    /// Binds the planner to externally agreed orders and demilitarized zones.
    pub fn with_commitments(mut self, commitments: Commitments) -> Self {
        self.commitments = commitments;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn commitments(&self) -> &Commitments {
        &self.commitments
    }

    /// Plans the orders of `power` for the snapshot's phase.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        power: Power,
        state: &BoardState,
        rng: &mut R,
    ) -> Result<Vec<Order>, PlanError> {
        self.config.validate()?;
        let ctx = PhaseContext::new(power, state, &self.config, self.commitments.demilitarized())?;
        let committed = self.commitments.resolve(&ctx)?;
        debug!(
            power = %power,
            year = state.year,
            season = ?state.season,
            phase = ?state.phase,
            units = ctx.units.len(),
            committed = committed.len(),
            "planning"
        );

        let orders = match state.phase {
            Phase::Movement => {
                let book = movement::plan(&ctx, &committed, rng);
                postpass::run(&ctx, book, rng)
            }
            Phase::Retreat => retreat::plan(&ctx, &committed, rng)?,
            Phase::Build => adjustment::plan(&ctx, &committed, rng),
        };

        debug!(power = %power, orders = orders.len(), "planned");
        Ok(orders)
    }

    /// Plans every power that has something to order, in parallel.
    ///
    /// Each power gets its own RNG seeded with `seed + power index`, so the
    /// result does not depend on thread scheduling. Committed orders are
    /// routed to the power that owns the ordered unit.
    pub fn plan_all(&self, state: &BoardState, seed: u64) -> Result<Vec<(Power, Vec<Order>)>, PlanError> {
        let by_power = self.commitments.split_by_power(state)?;
        ALL_POWERS
            .par_iter()
            .zip(by_power.into_par_iter())
            .filter(|(power, _)| has_orders(**power, state))
            .map(|(&power, commitments)| {
                let planner = Planner {
                    config: self.config.clone(),
                    commitments,
                };
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(power as u64));
                planner.plan(power, state, &mut rng).map(|orders| (power, orders))
            })
            .collect()
    }
}

/// True if `power` has to issue orders in the snapshot's phase.
pub fn has_orders(power: Power, state: &BoardState) -> bool {
    match state.phase {
        Phase::Movement => state.unit_count(power) > 0,
        Phase::Retreat => state.dislodged_of(power).next().is_some(),
        Phase::Build => state.adjustment(power) != 0,
    }
}

/// Plans `power`'s orders with the default configuration and no commitments.
pub fn plan_orders(power: Power, state: &BoardState, seed: u64) -> Result<Vec<Order>, PlanError> {
    let mut rng = StdRng::seed_from_u64(seed);
    Planner::default().plan(power, state, &mut rng)
}

/// Plans every power with the default configuration and no commitments.
pub fn plan_all(state: &BoardState, seed: u64) -> Result<Vec<(Power, Vec<Order>)>, PlanError> {
    Planner::default().plan_all(state, seed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::board::Location;
    use crate::protocol::parse_dfen;

    pub(crate) const INITIAL_DFEN: &str = "1901sm/Aavie,Aabud,Aftri,Eflon,Efedi,Ealvp,Ffbre,Fapar,Famar,Gfkie,Gaber,Gamun,Ifnap,Iarom,Iaven,Rfstp.sc,Ramos,Rawar,Rfsev,Tfank,Tacon,Tasmy/Abud,Atri,Avie,Eedi,Elon,Elvp,Fbre,Fmar,Fpar,Gber,Gkie,Gmun,Inap,Irom,Iven,Rmos,Rsev,Rstp,Rwar,Tank,Tcon,Tsmy,Nbel,Nbul,Nden,Ngre,Nhol,Nnwy,Npor,Nrum,Nser,Nspa,Nswe,Ntun/-";

    pub(crate) fn initial() -> BoardState {
        parse_dfen(INITIAL_DFEN).unwrap()
    }

    #[test]
    fn locate_reports_each_bad_placement() {
        assert!(matches!(
            locate(&MAP, Province::Nth, UnitType::Army, Coast::None),
            Err(PlanError::UnitOnImpassable { .. })
        ));
        assert!(matches!(
            locate(&MAP, Province::Vie, UnitType::Fleet, Coast::None),
            Err(PlanError::UnitOnImpassable { .. })
        ));
        assert!(matches!(
            locate(&MAP, Province::Stp, UnitType::Fleet, Coast::None),
            Err(PlanError::MissingCoast { province: Province::Stp })
        ));
        assert!(matches!(
            locate(&MAP, Province::Stp, UnitType::Fleet, Coast::East),
            Err(PlanError::InvalidCoast { .. })
        ));
        assert!(matches!(
            locate(&MAP, Province::Stp, UnitType::Army, Coast::North),
            Err(PlanError::InvalidCoast { .. })
        ));
        assert!(locate(&MAP, Province::Stp, UnitType::Fleet, Coast::South).is_ok());
    }

    #[test]
    fn malformed_snapshot_is_fatal() {
        let state = parse_dfen("1901sm/Aanth/Avie/-").unwrap();
        assert!(matches!(
            plan_orders(Power::Austria, &state, 0),
            Err(PlanError::UnitOnImpassable { .. })
        ));
        let state = parse_dfen("1901sm/Rfstp/Rstp/-").unwrap();
        assert!(matches!(
            plan_orders(Power::Russia, &state, 0),
            Err(PlanError::MissingCoast { .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_planning() {
        let planner = Planner::new(PlannerConfig {
            decay: 0.0,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            planner.plan(Power::Austria, &initial(), &mut rng),
            Err(PlanError::Config(ConfigError::InvalidDecay(_)))
        ));
    }

    #[test]
    fn context_lists_own_units_in_province_order() {
        let state = initial();
        let config = PlannerConfig::default();
        let blocked = ProvinceSet::new();
        let ctx = PhaseContext::new(Power::Austria, &state, &config, &blocked).unwrap();
        let provinces: Vec<Province> = ctx.units.iter().map(|&r| MAP.province(r)).collect();
        assert_eq!(provinces, vec![Province::Bud, Province::Tri, Province::Vie]);
        assert!(ctx.own_unit_at(Province::Vie).is_some());
        assert!(ctx.own_unit_at(Province::Ven).is_none());
        assert!(ctx.own_unit_at(Province::Gal).is_none());
    }

    #[test]
    fn order_book_tracks_moves_and_commitments() {
        let army = |p| crate::board::OrderUnit {
            unit_type: UnitType::Army,
            location: Location::new(p),
        };
        let mut book = OrderBook::new();
        book.commit(Order::Hold { unit: army(Province::Vie) });
        book.push(Order::Move {
            unit: army(Province::Bud),
            dest: Location::new(Province::Ser),
        });

        assert!(book.move_into(Province::Ser).is_some());
        assert!(book.move_into(Province::Vie).is_none());
        assert!(book.is_committed(Province::Vie));
        assert!(!book.replace(Province::Vie, Order::Hold { unit: army(Province::Vie) }));
        assert!(book.replace(Province::Bud, Order::Hold { unit: army(Province::Bud) }));
        assert_eq!(book.len(), 2);
        assert!(book.move_into(Province::Ser).is_none());
    }

    #[test]
    fn has_orders_by_phase() {
        let state = initial();
        assert!(has_orders(Power::Austria, &state));

        let build = parse_dfen("1901fb/Aavie/Avie,Abud/-").unwrap();
        assert!(has_orders(Power::Austria, &build));
        assert!(!has_orders(Power::Russia, &build));

        let retreat = parse_dfen("1901fr/Tabul/Abud/Aaser<bul").unwrap();
        assert!(has_orders(Power::Austria, &retreat));
        assert!(!has_orders(Power::Turkey, &retreat));
    }

    #[test]
    fn plan_all_covers_every_power_at_the_start() {
        let state = initial();
        let all = plan_all(&state, 42).unwrap();
        let powers: Vec<Power> = all.iter().map(|(p, _)| *p).collect();
        assert_eq!(powers, ALL_POWERS.to_vec());
        for (power, orders) in &all {
            assert_eq!(orders.len(), state.unit_count(*power));
        }
    }

    #[test]
    fn plan_all_matches_single_power_plans() {
        let state = initial();
        let all = plan_all(&state, 9).unwrap();
        for (power, orders) in all {
            let single = plan_orders(power, &state, 9 + power as u64).unwrap();
            assert_eq!(orders, single);
        }
    }
}
