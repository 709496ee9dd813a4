//! Movement-phase order assignment.
//!
//! Units are taken from a worklist in province order. Each ranks its
//! neighbors plus its own region and walks the list; the chosen region is
//! then turned into an order:
//!
//! 1. its own region: the best profitable support, else Hold;
//! 2. a province where one of our units still waits for an order: the unit
//!    is deferred behind that one (once; the second time the candidate is
//!    dropped);
//! 3. a province one of our moves already targets: support that move if a
//!    rival borders it, else drop the candidate;
//! 4. a province where our unit stays put: support it if a rival could
//!    bring two units against it, else drop the candidate;
//! 5. anything else: Move.
//!
//! Dropped candidates are removed and the walk repeats. The hold candidate
//! is never dropped, so every unit ends with an order.

use rand::Rng;
use tracing::trace;

use crate::board::{Location, Order, RegionId};
use crate::movegen::move_regions;

use super::postpass::best_support;
use super::select::{rank, walk};
use super::{OrderBook, PhaseContext};

#[derive(Debug, Clone, Copy)]
struct Work {
    unit: RegionId,
    deferred: bool,
}

#[derive(Debug, PartialEq)]
enum Choice {
    Order(Order),
    Defer,
    Drop,
}

/// Plans one order per uncommitted unit; committed orders are kept first.
pub fn plan<R: Rng + ?Sized>(ctx: &PhaseContext<'_>, committed: &[Order], rng: &mut R) -> OrderBook {
    let mut book = OrderBook::new();
    for &order in committed {
        book.commit(order);
    }

    let mut worklist: Vec<Work> = ctx
        .units
        .iter()
        .filter(|&&r| book.order_at(ctx.map.province(r)).is_none())
        .map(|&unit| Work {
            unit,
            deferred: false,
        })
        .collect();

    let mut i = 0;
    while i < worklist.len() {
        let work = worklist[i];
        i += 1;

        let mut candidates = move_regions(ctx.map, work.unit, ctx.blocked);
        rank(&mut candidates, &ctx.destination, rng);

        loop {
            let Some(idx) = walk(&candidates, &ctx.destination, ctx.config, rng) else {
                break;
            };
            let target = candidates[idx];
            match choose(ctx, &book, work, target, rng) {
                Choice::Order(order) => {
                    trace!(unit = %ctx.map.province(work.unit), order = ?order, "ordered");
                    book.push(order);
                    break;
                }
                Choice::Defer => {
                    let blocker = ctx.map.province(target);
                    let pos = worklist[i..]
                        .iter()
                        .position(|w| ctx.map.province(w.unit) == blocker)
                        .map_or(worklist.len(), |p| i + p + 1);
                    trace!(unit = %ctx.map.province(work.unit), behind = %blocker, "deferred");
                    worklist.insert(
                        pos,
                        Work {
                            unit: work.unit,
                            deferred: true,
                        },
                    );
                    break;
                }
                Choice::Drop => {
                    candidates.remove(idx);
                }
            }
        }
    }

    book
}

fn choose<R: Rng + ?Sized>(
    ctx: &PhaseContext<'_>,
    book: &OrderBook,
    work: Work,
    target: RegionId,
    rng: &mut R,
) -> Choice {
    let unit = ctx.map.region(work.unit).order_unit();
    if target == work.unit {
        let order = best_support(ctx, book, work.unit, rng).unwrap_or(Order::Hold { unit });
        return Choice::Order(order);
    }

    let prov = ctx.map.province(target);
    let occupant = ctx.own_unit_at(prov);
    let occupant_order = book.order_at(prov);
    if occupant.is_some() && occupant_order.is_none() {
        return if work.deferred {
            Choice::Drop
        } else {
            Choice::Defer
        };
    }

    if let Some(&Order::Move { unit: mover, .. }) = book.move_into(prov) {
        return if ctx.contest.competition(prov) > 0 {
            Choice::Order(Order::SupportMove {
                unit,
                supported: mover,
                dest: Location::new(prov),
            })
        } else {
            Choice::Drop
        };
    }

    if let (Some(occupant), Some(existing)) = (occupant, occupant_order) {
        if !existing.is_move() {
            return if ctx.contest.competition(prov) > 1 {
                Choice::Order(Order::SupportHold {
                    unit,
                    supported: ctx.map.region(occupant).order_unit(),
                })
            } else {
                Choice::Drop
            };
        }
    }

    Choice::Order(Order::Move {
        unit,
        dest: ctx.map.region(target).location(),
    })
}
