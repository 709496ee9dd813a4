//! DFEN board snapshots.
//!
//! A DFEN string describes a full position on one line:
//! `<phase_info>/<units>/<supply_centers>/<dislodged>`, for example
//! `1901sm/Aavie,Rfstp.sc,.../Abud,...,Nbel,.../Aaser<bul`.
//!
//! Unit tokens are `<power><unit><province>[.<coast>]`, SC tokens are
//! `<power|N><province>`, dislodged tokens are a unit token followed by
//! `<` and the province the attack came from. Empty sections are `-`.

use crate::board::province::{Coast, Power, Province};
use crate::board::state::{BoardState, DislodgedUnit, Phase, Season};
use crate::board::unit::UnitType;

/// Errors that can occur during DFEN parsing.
#[derive(Debug, thiserror::Error)]
pub enum DfenError {
    #[error("expected 4 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("phase info too short: '{0}'")]
    PhaseInfoTooShort(String),

    #[error("invalid year in phase info: '{0}'")]
    InvalidYear(String),

    #[error("invalid season character: '{0}'")]
    InvalidSeason(char),

    #[error("invalid phase character: '{0}'")]
    InvalidPhase(char),

    #[error("invalid power character: '{0}'")]
    InvalidPower(char),

    #[error("invalid unit type character: '{0}'")]
    InvalidUnitType(char),

    #[error("unknown province abbreviation: '{0}'")]
    UnknownProvince(String),

    #[error("invalid coast abbreviation: '{0}'")]
    InvalidCoast(String),

    #[error("province '{0}' is not a supply center")]
    NotSupplyCenter(String),

    #[error("duplicate {kind} entry at province '{province}'")]
    Duplicate { kind: &'static str, province: String },

    #[error("malformed {kind} entry: '{entry}'")]
    Malformed { kind: &'static str, entry: String },
}

/// A unit token after the power and unit characters have been decoded.
struct UnitToken {
    power: Power,
    unit_type: UnitType,
    province: Province,
    coast: Coast,
}

/// Splits the first character off a token.
fn split_head(s: &str) -> Option<(char, &str)> {
    let mut chars = s.chars();
    let head = chars.next()?;
    Some((head, chars.as_str()))
}

fn parse_province(s: &str) -> Result<Province, DfenError> {
    Province::from_abbr(s).ok_or_else(|| DfenError::UnknownProvince(s.to_string()))
}

/// Parses `vie`, `stp.sc` or `bul.ec` into a province and coast.
fn parse_location(s: &str) -> Result<(Province, Coast), DfenError> {
    match s.split_once('.') {
        Some((prov, coast_str)) => {
            let coast = Coast::from_abbr(coast_str)
                .filter(|&c| c != Coast::None)
                .ok_or_else(|| DfenError::InvalidCoast(coast_str.to_string()))?;
            Ok((parse_province(prov)?, coast))
        }
        None => Ok((parse_province(s)?, Coast::None)),
    }
}

fn parse_unit_token(entry: &str, kind: &'static str) -> Result<UnitToken, DfenError> {
    let malformed = || DfenError::Malformed {
        kind,
        entry: entry.to_string(),
    };
    let (power_char, rest) = split_head(entry).ok_or_else(malformed)?;
    let (unit_char, location) = split_head(rest).ok_or_else(malformed)?;
    if location.is_empty() {
        return Err(malformed());
    }

    let power = Power::from_dfen_char(power_char).ok_or(DfenError::InvalidPower(power_char))?;
    let unit_type =
        UnitType::from_dfen_char(unit_char).ok_or(DfenError::InvalidUnitType(unit_char))?;
    let (province, coast) = parse_location(location)?;
    Ok(UnitToken {
        power,
        unit_type,
        province,
        coast,
    })
}

/// Parses the phase info section (e.g., "1901sm").
fn parse_phase_info(s: &str) -> Result<(u16, Season, Phase), DfenError> {
    let mut tail = s.chars().rev();
    let (Some(phase_char), Some(season_char)) = (tail.next(), tail.next()) else {
        return Err(DfenError::PhaseInfoTooShort(s.to_string()));
    };
    let year_str = &s[..s.len() - phase_char.len_utf8() - season_char.len_utf8()];
    if year_str.is_empty() {
        return Err(DfenError::PhaseInfoTooShort(s.to_string()));
    }

    let year: u16 = year_str
        .parse()
        .map_err(|_| DfenError::InvalidYear(year_str.to_string()))?;
    let season = Season::from_dfen_char(season_char).ok_or(DfenError::InvalidSeason(season_char))?;
    let phase = Phase::from_dfen_char(phase_char).ok_or(DfenError::InvalidPhase(phase_char))?;

    Ok((year, season, phase))
}

/// Iterates the comma-separated entries of a section; `-` means none.
fn entries(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').filter(move |_| s != "-" && !s.is_empty())
}

fn parse_units(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    for entry in entries(s) {
        let t = parse_unit_token(entry, "unit")?;
        if !state.place_unit(t.province, t.power, t.unit_type, t.coast) {
            return Err(DfenError::Duplicate {
                kind: "unit",
                province: t.province.abbr().to_string(),
            });
        }
    }
    Ok(())
}

fn parse_supply_centers(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    let mut seen = [false; crate::board::province::PROVINCE_COUNT];
    for entry in entries(s) {
        let (power_char, prov_str) = split_head(entry).ok_or_else(|| DfenError::Malformed {
            kind: "supply center",
            entry: entry.to_string(),
        })?;
        let owner = match power_char {
            'N' => None,
            c => Some(Power::from_dfen_char(c).ok_or(DfenError::InvalidPower(c))?),
        };
        let province = parse_province(prov_str)?;
        if !province.is_supply_center() {
            return Err(DfenError::NotSupplyCenter(prov_str.to_string()));
        }
        if std::mem::replace(&mut seen[province as usize], true) {
            return Err(DfenError::Duplicate {
                kind: "supply center",
                province: province.abbr().to_string(),
            });
        }
        state.set_sc_owner(province, owner);
    }
    Ok(())
}

fn parse_dislodged(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    for entry in entries(s) {
        let (unit_part, attacker) = entry.split_once('<').ok_or_else(|| DfenError::Malformed {
            kind: "dislodged",
            entry: entry.to_string(),
        })?;
        let t = parse_unit_token(unit_part, "dislodged")?;
        let attacker_from = parse_province(attacker)?;

        if state.dislodged[t.province as usize].is_some() {
            return Err(DfenError::Duplicate {
                kind: "dislodged",
                province: t.province.abbr().to_string(),
            });
        }
        state.set_dislodged(
            t.province,
            DislodgedUnit {
                power: t.power,
                unit_type: t.unit_type,
                coast: t.coast,
                attacker_from,
            },
        );
    }
    Ok(())
}

/// Parses a DFEN string into a BoardState.
pub fn parse_dfen(s: &str) -> Result<BoardState, DfenError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    let [phase_info, units, centers, dislodged] = sections[..] else {
        return Err(DfenError::WrongSectionCount(sections.len()));
    };

    let (year, season, phase) = parse_phase_info(phase_info)?;
    let mut state = BoardState::empty(year, season, phase);

    parse_units(units, &mut state)?;
    parse_supply_centers(centers, &mut state)?;
    parse_dislodged(dislodged, &mut state)?;

    Ok(state)
}
