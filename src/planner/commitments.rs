//! Binding commitments from negotiation.
//!
//! A power that has struck deals may be bound to issue particular orders
//! and to keep out of demilitarized provinces. Committed orders are placed
//! verbatim before planning starts and their units are not planned;
//! demilitarized provinces are removed from every movement, retreat and
//! build candidate list. A unit already standing in one may still hold.

use crate::board::{BoardState, Order, Phase, Power, Province, ProvinceSet, ALL_POWERS};

use super::{locate, PhaseContext, PlanError};

/// Orders and demilitarized zones a power has agreed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commitments {
    orders: Vec<Order>,
    demilitarized: ProvinceSet,
}

impl Commitments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a committed order.
    pub fn commit(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Marks a province as off limits.
    pub fn demilitarize(&mut self, province: Province) {
        self.demilitarized.insert(province);
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.commit(order);
        self
    }

    pub fn with_demilitarized(mut self, province: Province) -> Self {
        self.demilitarize(province);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn demilitarized(&self) -> &ProvinceSet {
        &self.demilitarized
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.demilitarized.is_empty()
    }

    /// Splits the commitments per power in `ALL_POWERS` order.
    ///
    /// Each order goes to the power owning the unit it names (the home power
    /// for builds); every power keeps the full demilitarized set.
    pub fn split_by_power(&self, state: &BoardState) -> Result<Vec<Commitments>, PlanError> {
        let mut out: Vec<Commitments> = ALL_POWERS
            .iter()
            .map(|_| Commitments {
                orders: Vec::new(),
                demilitarized: self.demilitarized,
            })
            .collect();
        for order in &self.orders {
            let power = owner(order, state)
                .ok_or_else(|| PlanError::UnownedCommitment(crate::protocol::format_order(order)))?;
            out[power as usize].commit(*order);
        }
        Ok(out)
    }

    /// Validates the committed orders against the planning power and phase.
    ///
    /// Returns them in commitment order; in adjustment phases a disband is
    /// read as a removal.
    pub fn resolve(&self, ctx: &PhaseContext<'_>) -> Result<Vec<Order>, PlanError> {
        let mut seen = ProvinceSet::new();
        let mut builds = 0i32;
        let mut removes = 0i32;
        let owed = ctx.state.adjustment(ctx.power);
        let mut out = Vec::with_capacity(self.orders.len());

        for order in &self.orders {
            let order = normalize(*order, ctx.state.phase);
            if let Some(prov) = order.origin() {
                if !seen.insert(prov) {
                    return Err(PlanError::DuplicateCommitment(prov));
                }
            }
            if !applies(&order, ctx)? {
                return Err(PlanError::foreign(&order, ctx.power));
            }
            match order {
                Order::Build { .. } | Order::Waive => builds += 1,
                Order::Remove { .. } => removes += 1,
                _ => {}
            }
            if builds > owed.max(0) || removes > (-owed).max(0) {
                return Err(PlanError::foreign(&order, ctx.power));
            }
            out.push(order);
        }
        Ok(out)
    }
}

fn normalize(order: Order, phase: Phase) -> Order {
    match (phase, order) {
        (Phase::Build, Order::Disband { unit }) => Order::Remove { unit },
        _ => order,
    }
}

/// The power a committed order belongs to, if the unit it names exists.
pub fn owner(order: &Order, state: &BoardState) -> Option<Power> {
    let prov = order.origin()?;
    match (state.phase, order) {
        (Phase::Build, Order::Build { .. }) => prov.home_power(),
        (Phase::Retreat, _) => state.dislodged[prov as usize].map(|d| d.power),
        _ => state.units[prov as usize].map(|(p, _)| p),
    }
}

/// True if `order` is one the planning power could issue this phase.
fn applies(order: &Order, ctx: &PhaseContext<'_>) -> Result<bool, PlanError> {
    let state = ctx.state;
    let own_unit = |unit: &crate::board::OrderUnit| {
        matches!(
            state.units[unit.location.province as usize],
            Some((p, t)) if p == ctx.power && t == unit.unit_type
        )
    };

    Ok(match (state.phase, order) {
        (
            Phase::Movement,
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. },
        ) => own_unit(unit),
        (Phase::Retreat, Order::Retreat { unit, .. } | Order::Disband { unit }) => matches!(
            state.dislodged[unit.location.province as usize],
            Some(d) if d.power == ctx.power && d.unit_type == unit.unit_type
        ),
        (Phase::Build, Order::Build { unit }) => {
            let prov = unit.location.province;
            let home = prov.is_supply_center()
                && prov.home_power() == Some(ctx.power)
                && state.sc_owner[prov as usize] == Some(ctx.power)
                && state.units[prov as usize].is_none();
            if home {
                locate(ctx.map, prov, unit.unit_type, unit.location.coast)?;
            }
            home
        }
        (Phase::Build, Order::Waive) => true,
        (Phase::Build, Order::Remove { unit }) => own_unit(unit),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coast, Location, OrderUnit, UnitType};
    use crate::config::PlannerConfig;
    use crate::planner::tests::initial;
    use crate::protocol::{parse_dfen, parse_order};

    fn resolve(state: &BoardState, power: Power, c: &Commitments) -> Result<Vec<Order>, PlanError> {
        let config = PlannerConfig::default();
        let ctx = PhaseContext::new(power, state, &config, c.demilitarized())?;
        c.resolve(&ctx)
    }

    fn commit(text: &str) -> Commitments {
        Commitments::new().with_order(parse_order(text).unwrap())
    }

    #[test]
    fn own_movement_orders_pass() {
        let c = commit("A vie - gal").with_order(parse_order("F tri H").unwrap());
        let orders = resolve(&initial(), Power::Austria, &c).unwrap();
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn foreign_unit_is_rejected() {
        let c = commit("A war - gal");
        assert!(matches!(
            resolve(&initial(), Power::Austria, &c),
            Err(PlanError::ForeignCommitment { power: Power::Austria, .. })
        ));
    }

    #[test]
    fn wrong_unit_type_is_rejected() {
        let c = commit("F vie H");
        assert!(matches!(
            resolve(&initial(), Power::Austria, &c),
            Err(PlanError::ForeignCommitment { .. })
        ));
    }

    #[test]
    fn wrong_phase_is_rejected() {
        let c = commit("A vie R boh");
        assert!(matches!(
            resolve(&initial(), Power::Austria, &c),
            Err(PlanError::ForeignCommitment { .. })
        ));
    }

    #[test]
    fn duplicate_unit_is_rejected() {
        let c = commit("A vie H").with_order(parse_order("A vie - tyr").unwrap());
        assert!(matches!(
            resolve(&initial(), Power::Austria, &c),
            Err(PlanError::DuplicateCommitment(Province::Vie))
        ));
    }

    #[test]
    fn adjustment_disband_becomes_remove() {
        let state = parse_dfen("1901fb/Aavie,Aabud/Avie/-").unwrap();
        let orders = resolve(&state, Power::Austria, &commit("A bud D")).unwrap();
        assert_eq!(
            orders,
            vec![Order::Remove {
                unit: OrderUnit {
                    unit_type: UnitType::Army,
                    location: Location::new(Province::Bud),
                }
            }]
        );
    }

    #[test]
    fn builds_limited_to_what_is_owed() {
        let state = parse_dfen("1901fb/Aavie/Avie,Abud,Atri/-").unwrap();
        let two = commit("A bud B").with_order(parse_order("W").unwrap());
        assert_eq!(resolve(&state, Power::Austria, &two).unwrap().len(), 2);

        let three = two.with_order(parse_order("W").unwrap());
        assert!(resolve(&state, Power::Austria, &three).is_err());

        // no removal is owed while building
        assert!(resolve(&state, Power::Austria, &commit("A vie D")).is_err());
    }

    #[test]
    fn build_site_must_be_a_free_owned_home() {
        let state = parse_dfen("1901fb/Aavie/Avie,Abud,Atri,Aser/-").unwrap();
        assert!(resolve(&state, Power::Austria, &commit("A vie B")).is_err());
        assert!(resolve(&state, Power::Austria, &commit("A ser B")).is_err());
        assert!(resolve(&state, Power::Austria, &commit("F bud B")).is_err());
        assert!(matches!(
            resolve(&state, Power::Austria, &commit("A tri/sc B")),
            Err(PlanError::InvalidCoast { .. })
        ));
        assert!(resolve(&state, Power::Austria, &commit("F tri B")).is_ok());
    }

    #[test]
    fn retreat_commitment_needs_own_dislodged_unit() {
        let state = parse_dfen("1901fr/Tabul/Abud/Aaser<bul").unwrap();
        assert!(resolve(&state, Power::Austria, &commit("A ser R alb")).is_ok());
        assert!(resolve(&state, Power::Austria, &commit("A ser D")).is_ok());
        assert!(resolve(&state, Power::Turkey, &commit("A ser R alb")).is_err());
    }

    #[test]
    fn split_routes_orders_to_owners() {
        let state = initial();
        let c = commit("A vie - gal")
            .with_order(parse_order("A war - gal").unwrap())
            .with_demilitarized(Province::Gal);
        let split = c.split_by_power(&state).unwrap();
        assert_eq!(split.len(), 7);
        assert_eq!(split[Power::Austria as usize].orders().len(), 1);
        assert_eq!(split[Power::Russia as usize].orders().len(), 1);
        assert!(split[Power::France as usize].orders().is_empty());
        assert!(split.iter().all(|s| s.demilitarized().contains(Province::Gal)));
    }

    #[test]
    fn split_rejects_orders_for_empty_provinces() {
        let c = commit("A gal H");
        assert!(matches!(
            c.split_by_power(&initial()),
            Err(PlanError::UnownedCommitment(_))
        ));
        assert!(matches!(
            commit("W").split_by_power(&initial()),
            Err(PlanError::UnownedCommitment(_))
        ));
    }

    #[test]
    fn owner_uses_home_power_for_builds() {
        let state = parse_dfen("1901fb/-/Avie/-").unwrap();
        let order = Order::Build {
            unit: OrderUnit {
                unit_type: UnitType::Fleet,
                location: Location::with_coast(Province::Stp, Coast::North),
            },
        };
        assert_eq!(owner(&order, &state), Some(Power::Russia));
    }
}
