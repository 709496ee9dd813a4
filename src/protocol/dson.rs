//! DSON (Diplomacy Standard Order Notation).
//!
//! Planned orders are printed in DSON, and committed orders arrive in it.
//! Province IDs are 3-letter lowercase, the coast separator is `/`, and
//! unit types are uppercase A/F. Multiple orders are joined with ` ; `.
//!
//! ```text
//! A vie H              F nrg - stp/nc        A tyr S A vie H
//! A gal S A bud - rum  A ser R alb           F tri D
//! F stp/sc B           W
//! ```
//!
//! `D` is written for both a retreat-phase disband and an adjustment-phase
//! removal; the parser reads it as `Order::Disband`.

use std::fmt;

use thiserror::Error;

use crate::board::order::{Location, Order, OrderUnit};
use crate::board::province::{Coast, Province};
use crate::board::unit::UnitType;

/// Errors that can occur when parsing DSON order strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DsonError {
    #[error("empty input")]
    EmptyInput,

    #[error("unknown unit type '{0}'")]
    UnknownUnitType(String),

    #[error("unknown province '{0}'")]
    UnknownProvince(String),

    #[error("unknown coast '{0}'")]
    UnknownCoast(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: &'static str, found: String },

    #[error("trailing input '{0}'")]
    Trailing(String),
}

/// Whitespace-separated token cursor over one order.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Tokens {
            iter: s.split_whitespace(),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, DsonError> {
        self.iter.next().ok_or(DsonError::UnexpectedEnd(expected))
    }

    fn unit(&mut self) -> Result<OrderUnit, DsonError> {
        let unit_type = match self.next("unit type (A or F)")? {
            "A" => UnitType::Army,
            "F" => UnitType::Fleet,
            other => return Err(DsonError::UnknownUnitType(other.to_string())),
        };
        let location = self.location()?;
        Ok(OrderUnit {
            unit_type,
            location,
        })
    }

    fn location(&mut self) -> Result<Location, DsonError> {
        let token = self.next("province location")?;
        let (prov_str, coast_str) = match token.split_once('/') {
            Some((p, c)) => (p, Some(c)),
            None => (token, None),
        };
        let province = Province::from_abbr(prov_str)
            .ok_or_else(|| DsonError::UnknownProvince(prov_str.to_string()))?;
        let coast = match coast_str {
            Some(c) => Coast::from_abbr(c).ok_or_else(|| DsonError::UnknownCoast(c.to_string()))?,
            None => Coast::None,
        };
        Ok(Location::with_coast(province, coast))
    }

    fn finish(mut self, order: Order) -> Result<Order, DsonError> {
        match self.iter.next() {
            None => Ok(order),
            Some(extra) => Err(DsonError::Trailing(extra.to_string())),
        }
    }
}

/// Parses a single DSON order string into an `Order`.
pub fn parse_order(s: &str) -> Result<Order, DsonError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DsonError::EmptyInput);
    }
    if s == "W" {
        return Ok(Order::Waive);
    }

    let mut tokens = Tokens::new(s);
    let unit = tokens.unit()?;
    let order = match tokens.next("action (H, -, S, R, D, B)")? {
        "H" => Order::Hold { unit },
        "-" => Order::Move {
            unit,
            dest: tokens.location()?,
        },
        "S" => {
            let supported = tokens.unit()?;
            match tokens.next("H or - after supported unit")? {
                "H" => Order::SupportHold { unit, supported },
                "-" => Order::SupportMove {
                    unit,
                    supported,
                    dest: tokens.location()?,
                },
                other => {
                    return Err(DsonError::UnexpectedToken {
                        expected: "H or -",
                        found: other.to_string(),
                    })
                }
            }
        }
        "R" => Order::Retreat {
            unit,
            dest: tokens.location()?,
        },
        "D" => Order::Disband { unit },
        "B" => Order::Build { unit },
        other => return Err(DsonError::UnknownAction(other.to_string())),
    };
    tokens.finish(order)
}

/// Parses a ` ; `-separated list of DSON orders.
pub fn parse_orders(s: &str) -> Result<Vec<Order>, DsonError> {
    if s.trim().is_empty() {
        return Err(DsonError::EmptyInput);
    }
    s.split(';').map(parse_order).collect()
}

/// Formats a single `Order` as a canonical DSON string.
pub fn format_order(order: &Order) -> String {
    order.to_string()
}

/// Formats a slice of orders as a ` ; `-separated DSON string.
pub fn format_orders(orders: &[Order]) -> String {
    orders
        .iter()
        .map(format_order)
        .collect::<Vec<_>>()
        .join(" ; ")
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coast {
            Coast::None => f.write_str(self.province.abbr()),
            coast => write!(f, "{}/{}", self.province.abbr(), coast.abbr()),
        }
    }
}

impl fmt::Display for OrderUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.unit_type.dson_char(), self.location)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Hold { unit } => write!(f, "{unit} H"),
            Order::Move { unit, dest } => write!(f, "{unit} - {dest}"),
            Order::SupportHold { unit, supported } => write!(f, "{unit} S {supported} H"),
            Order::SupportMove {
                unit,
                supported,
                dest,
            } => write!(f, "{unit} S {supported} - {dest}"),
            Order::Retreat { unit, dest } => write!(f, "{unit} R {dest}"),
            Order::Disband { unit } | Order::Remove { unit } => write!(f, "{unit} D"),
            Order::Build { unit } => write!(f, "{unit} B"),
            Order::Waive => f.write_str("W"),
        }
    }
}
