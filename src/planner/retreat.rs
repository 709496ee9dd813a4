//! Retreat-phase planning.

use rand::Rng;
use tracing::trace;

use crate::board::{Order, ProvinceSet};
use crate::movegen::retreat_regions;

use super::select::{rank, walk};
use super::{locate, PhaseContext, PlanError};

/// Orders every dislodged unit of the planning power to retreat or disband.
///
/// Two retreats never share a destination. A unit with no free region left
/// disbands.
pub fn plan<R: Rng + ?Sized>(
    ctx: &PhaseContext<'_>,
    committed: &[Order],
    rng: &mut R,
) -> Result<Vec<Order>, PlanError> {
    let mut orders = committed.to_vec();
    let mut taken: ProvinceSet = committed.iter().filter_map(Order::destination).collect();

    for (prov, dislodged) in ctx.state.dislodged_of(ctx.power) {
        if orders.iter().any(|o| o.origin() == Some(prov)) {
            continue;
        }
        let region = locate(ctx.map, prov, dislodged.unit_type, dislodged.coast)?;
        let unit = ctx.map.region(region).order_unit();

        let mut candidates = retreat_regions(ctx.map, ctx.state, region, dislodged.attacker_from, ctx.blocked);
        rank(&mut candidates, &ctx.destination, rng);

        let order = loop {
            let Some(idx) = walk(&candidates, &ctx.destination, ctx.config, rng) else {
                break Order::Disband { unit };
            };
            let target = candidates[idx];
            if taken.insert(ctx.map.province(target)) {
                break Order::Retreat {
                    unit,
                    dest: ctx.map.region(target).location(),
                };
            }
            candidates.remove(idx);
        };
        trace!(unit = %prov, order = ?order, "retreat");
        orders.push(order);
    }

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::{BoardState, Coast, DislodgedUnit, Phase, Power, Province, Season, UnitType};
    use crate::config::PlannerConfig;
    use crate::protocol::parse_dfen;

    fn plan_for(state: &BoardState, power: Power, blocked: &ProvinceSet, seed: u64) -> Vec<Order> {
        let config = PlannerConfig::default();
        let ctx = PhaseContext::new(power, state, &config, blocked).unwrap();
        plan(&ctx, &[], &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn retreats_to_a_legal_region() {
        let state = parse_dfen("1901fr/Tabul,Aabud,Iaalb/Abud/Aaser<bul").unwrap();
        for seed in 0..30 {
            let orders = plan_for(&state, Power::Austria, &ProvinceSet::new(), seed);
            assert_eq!(orders.len(), 1);
            match orders[0] {
                Order::Retreat { dest, .. } => {
                    assert!(matches!(dest.province, Province::Gre | Province::Rum | Province::Tri));
                }
                other => panic!("expected a retreat, got {other:?}"),
            }
        }
    }

    #[test]
    fn nowhere_to_go_disbands() {
        let state = parse_dfen("1901fr/Tabul,Aabud,Iaalb,Iagre,Iarum,Iatri/Abud/Aaser<bul").unwrap();
        let orders = plan_for(&state, Power::Austria, &ProvinceSet::new(), 0);
        assert!(matches!(orders[..], [Order::Disband { .. }]));
    }

    #[test]
    fn blocked_regions_force_a_disband() {
        let state = parse_dfen("1901fr/Tabul,Aabud,Iaalb/Abud/Aaser<bul").unwrap();
        let blocked: ProvinceSet = [Province::Gre, Province::Rum, Province::Tri].into_iter().collect();
        let orders = plan_for(&state, Power::Austria, &blocked, 0);
        assert!(matches!(orders[..], [Order::Disband { .. }]));
    }

    #[test]
    fn two_units_never_share_a_destination() {
        // Both dislodged units can only reach Tyrolia.
        let mut state = BoardState::empty(1901, Season::Fall, Phase::Retreat);
        for p in [Province::Boh, Province::Gal, Province::Mun, Province::Pie, Province::Tri, Province::Vie] {
            state.place_unit(p, Power::Germany, UnitType::Army, Coast::None);
        }
        for p in [Province::Ven, Province::Apu, Province::Rom, Province::Tus] {
            state.place_unit(p, Power::Italy, UnitType::Army, Coast::None);
        }
        let dislodged = |attacker_from| DislodgedUnit {
            power: Power::Austria,
            unit_type: UnitType::Army,
            coast: Coast::None,
            attacker_from,
        };
        state.set_dislodged(Province::Boh, dislodged(Province::Sil));
        state.set_dislodged(Province::Ven, dislodged(Province::Apu));

        for seed in 0..20 {
            let orders = plan_for(&state, Power::Austria, &ProvinceSet::new(), seed);
            assert_eq!(orders.len(), 2);
            let retreats = orders.iter().filter(|o| matches!(o, Order::Retreat { .. })).count();
            let disbands = orders.iter().filter(|o| matches!(o, Order::Disband { .. })).count();
            assert_eq!((retreats, disbands), (1, 1), "seed {seed}: {orders:?}");
        }
    }

    #[test]
    fn committed_units_are_not_replanned() {
        let state = parse_dfen("1901fr/Tabul,Aabud,Iaalb,Iagre,Iarum/Abud/Aaser<bul").unwrap();
        let config = PlannerConfig::default();
        let blocked = ProvinceSet::new();
        let ctx = PhaseContext::new(Power::Austria, &state, &config, &blocked).unwrap();
        let committed = [crate::protocol::parse_order("A ser D").unwrap()];
        let orders = plan(&ctx, &committed, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(orders, committed.to_vec());
    }

    #[test]
    fn other_powers_are_not_ordered() {
        let state = parse_dfen("1901fr/Tabul,Aabud/Abud/Aaser<bul").unwrap();
        assert!(plan_for(&state, Power::Turkey, &ProvinceSet::new(), 0).is_empty());
    }
}
