//! Hold-to-support conversion after movement planning.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::board::{Location, Order, RegionId};

use super::{OrderBook, PhaseContext};

/// Best support the unit in `unit` could give instead of holding.
///
/// Neighbors are examined in random order. A neighbor qualifies when one of
/// our moves targets it and a rival borders it, or when our own unit stays
/// there and a rival could bring two units against it. The neighbor with
/// the highest positive value wins; the first seen wins a tie.
pub fn best_support<R: Rng + ?Sized>(
    ctx: &PhaseContext<'_>,
    book: &OrderBook,
    unit: RegionId,
    rng: &mut R,
) -> Option<Order> {
    let supporter = ctx.map.region(unit).order_unit();
    let mut neighbors: Vec<RegionId> = ctx.map.adjacent(unit).to_vec();
    neighbors.shuffle(rng);

    let mut best: Option<(i64, Order)> = None;
    for n in neighbors {
        let prov = ctx.map.province(n);
        let competition = ctx.contest.competition(prov);

        let candidate = if let Some(&Order::Move { unit: mover, .. }) = book.move_into(prov) {
            (competition > 0).then_some(Order::SupportMove {
                unit: supporter,
                supported: mover,
                dest: Location::new(prov),
            })
        } else {
            match (ctx.own_unit_at(prov), book.order_at(prov)) {
                (Some(held), Some(existing)) if !existing.is_move() && competition > 1 => {
                    Some(Order::SupportHold {
                        unit: supporter,
                        supported: ctx.map.region(held).order_unit(),
                    })
                }
                _ => None,
            }
        };

        let Some(order) = candidate else { continue };
        let value = ctx.value(n);
        if value > 0 && best.map_or(true, |(v, _)| value > v) {
            best = Some((value, order));
        }
    }
    best.map(|(_, order)| order)
}

/// Upgrades planned holds to supports and closes the order list.
///
/// Committed orders are left alone. The result holds one order per unit,
/// first order wins, and any unit still without one holds.
pub fn run<R: Rng + ?Sized>(ctx: &PhaseContext<'_>, mut book: OrderBook, rng: &mut R) -> Vec<Order> {
    for &unit in &ctx.units {
        let prov = ctx.map.province(unit);
        if book.is_committed(prov) || !book.order_at(prov).is_some_and(Order::is_hold) {
            continue;
        }
        if let Some(support) = best_support(ctx, &book, unit, rng) {
            trace!(unit = %prov, order = ?support, "hold upgraded");
            book.replace(prov, support);
        }
    }

    let mut orders: Vec<Order> = Vec::with_capacity(book.len());
    for order in book.into_orders() {
        let taken = order
            .origin()
            .is_some_and(|p| orders.iter().any(|o| o.origin() == Some(p)));
        if !taken {
            orders.push(order);
        }
    }
    for &unit in &ctx.units {
        let prov = ctx.map.province(unit);
        if !orders.iter().any(|o| o.origin() == Some(prov)) {
            orders.push(Order::Hold {
                unit: ctx.map.region(unit).order_unit(),
            });
        }
    }
    orders
}
