//! Adjustment-phase planning: builds, waives and removals.

use rand::Rng;
use tracing::trace;

use crate::board::{Order, ProvinceSet, RegionId};
use crate::movegen::build_regions;

use super::select::{rank, rank_ascending, walk};
use super::PhaseContext;

/// Plans exactly as many builds (or removals) as the power owes.
///
/// Committed orders count toward the total. Each build walks the ranked
/// sites and then drops every other region of the chosen province; builds
/// with no site left become waives. Removals take the least valuable
/// units.
pub fn plan<R: Rng + ?Sized>(ctx: &PhaseContext<'_>, committed: &[Order], rng: &mut R) -> Vec<Order> {
    let owed = ctx.state.adjustment(ctx.power);
    let mut orders = committed.to_vec();

    if owed > 0 {
        let done = committed
            .iter()
            .filter(|o| matches!(o, Order::Build { .. } | Order::Waive))
            .count();
        let used: ProvinceSet = committed
            .iter()
            .filter(|o| matches!(o, Order::Build { .. }))
            .filter_map(Order::origin)
            .collect();

        let mut sites: Vec<RegionId> = build_regions(ctx.map, ctx.power, ctx.state, ctx.blocked)
            .into_iter()
            .filter(|&r| !used.contains(ctx.map.province(r)))
            .collect();
        rank(&mut sites, &ctx.destination, rng);

        for _ in done..owed as usize {
            let order = match walk(&sites, &ctx.destination, ctx.config, rng) {
                Some(idx) => {
                    let region = sites[idx];
                    let prov = ctx.map.province(region);
                    sites.retain(|&r| ctx.map.province(r) != prov);
                    Order::Build {
                        unit: ctx.map.region(region).order_unit(),
                    }
                }
                None => Order::Waive,
            };
            trace!(order = ?order, "adjustment");
            orders.push(order);
        }
    } else if owed < 0 {
        let done = committed
            .iter()
            .filter(|o| matches!(o, Order::Remove { .. }))
            .count();
        let removed: ProvinceSet = committed.iter().filter_map(Order::origin).collect();

        let mut units: Vec<RegionId> = ctx
            .units
            .iter()
            .copied()
            .filter(|&r| !removed.contains(ctx.map.province(r)))
            .collect();
        rank_ascending(&mut units, &ctx.destination, rng);

        let remaining = (owed.unsigned_abs() as usize).saturating_sub(done);
        for &region in units.iter().take(remaining) {
            let order = Order::Remove {
                unit: ctx.map.region(region).order_unit(),
            };
            trace!(order = ?order, "adjustment");
            orders.push(order);
        }
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::{BoardState, Power, Province, UnitType};
    use crate::config::PlannerConfig;
    use crate::protocol::{parse_dfen, parse_order};

    fn plan_for(state: &BoardState, power: Power, committed: &[Order], seed: u64) -> Vec<Order> {
        let config = PlannerConfig::default();
        let blocked = ProvinceSet::new();
        let ctx = PhaseContext::new(power, state, &config, &blocked).unwrap();
        plan(&ctx, committed, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn builds_fill_free_home_centers() {
        let state = parse_dfen("1901fb/Aavie/Avie,Abud,Atri/-").unwrap();
        for seed in 0..30 {
            let orders = plan_for(&state, Power::Austria, &[], seed);
            assert_eq!(orders.len(), 2);
            let mut provinces: Vec<Province> = orders
                .iter()
                .map(|o| match o {
                    Order::Build { unit } => unit.location.province,
                    other => panic!("expected a build, got {other:?}"),
                })
                .collect();
            provinces.sort_by_key(|p| *p as u8);
            assert_eq!(provinces, vec![Province::Bud, Province::Tri], "seed {seed}");
        }
    }

    #[test]
    fn missing_sites_become_waives() {
        // Three builds owed but only Budapest is free.
        let state = parse_dfen("1901fb/Aavie,Aftri/Avie,Abud,Atri,Aser,Agre/-").unwrap();
        let orders = plan_for(&state, Power::Austria, &[], 4);
        assert_eq!(orders.len(), 3);
        assert!(matches!(orders[0], Order::Build { unit } if unit.location.province == Province::Bud));
        assert_eq!(orders[1..], [Order::Waive, Order::Waive]);
    }

    #[test]
    fn committed_build_counts_and_reserves_its_site() {
        let state = parse_dfen("1901fb/Aavie/Avie,Abud,Atri/-").unwrap();
        let committed = [parse_order("F tri B").unwrap()];
        let orders = plan_for(&state, Power::Austria, &committed, 7);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0], committed[0]);
        assert!(matches!(orders[1], Order::Build { unit } if unit.location.province == Province::Bud));
    }

    #[test]
    fn removals_match_what_is_owed() {
        let state = parse_dfen("1901fb/Aavie,Aabud,Aftri/Avie/-").unwrap();
        for seed in 0..20 {
            let orders = plan_for(&state, Power::Austria, &[], seed);
            assert_eq!(orders.len(), 2, "seed {seed}");
            assert!(orders.iter().all(|o| matches!(o, Order::Remove { .. })));
            assert_ne!(orders[0].origin(), orders[1].origin());
        }
    }

    #[test]
    fn committed_removal_counts() {
        let state = parse_dfen("1901fb/Aavie,Aabud,Aftri/Avie/-").unwrap();
        let committed = [Order::Remove {
            unit: crate::board::OrderUnit {
                unit_type: UnitType::Army,
                location: crate::board::Location::new(Province::Vie),
            },
        }];
        let orders = plan_for(&state, Power::Austria, &committed, 1);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0], committed[0]);
        assert_ne!(orders[1].origin(), Some(Province::Vie));
    }

    #[test]
    fn balanced_power_orders_nothing() {
        let state = parse_dfen("1901fb/Aavie/Avie/-").unwrap();
        assert!(plan_for(&state, Power::Austria, &[], 0).is_empty());
    }
}
