//! Trait profile derivation
//!
//! Maps a birth date to one of twelve signs through a fixed month/day
//! boundary table, then to one of four trait groups. The mapping is a
//! deterministic categorical feature and nothing more.

use crate::BirthDate;
use chrono::{Datelike, NaiveDate};

/// One of the twelve calendar signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// One of the four trait groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum TraitGroup {
    Fire,
    Earth,
    Air,
    Water,
}

/// First day of each sign, in calendar order.
/// A date belongs to the last entry whose start is on or before it.
const SIGN_STARTS: [((u32, u32), Sign); 12] = [
    ((1, 20), Sign::Aquarius),
    ((2, 19), Sign::Pisces),
    ((3, 21), Sign::Aries),
    ((4, 20), Sign::Taurus),
    ((5, 21), Sign::Gemini),
    ((6, 21), Sign::Cancer),
    ((7, 23), Sign::Leo),
    ((8, 23), Sign::Virgo),
    ((9, 23), Sign::Libra),
    ((10, 23), Sign::Scorpio),
    ((11, 22), Sign::Sagittarius),
    ((12, 22), Sign::Capricorn),
];

impl Sign {
    /// Sign for a month (1-12) and day
    ///
    /// Dates before January 20 wrap around to Capricorn.
    pub fn from_month_day(month: u32, day: u32) -> Self {
        SIGN_STARTS
            .iter()
            .rev()
            .find(|(start, _)| (month, day) >= *start)
            .map(|(_, sign)| *sign)
            .unwrap_or(Sign::Capricorn)
    }

    /// Sign for a calendar date; the year is ignored
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_month_day(date.month(), date.day())
    }

    /// Trait group this sign belongs to
    pub fn group(&self) -> TraitGroup {
        match self {
            Sign::Aries | Sign::Leo | Sign::Sagittarius => TraitGroup::Fire,
            Sign::Taurus | Sign::Virgo | Sign::Capricorn => TraitGroup::Earth,
            Sign::Gemini | Sign::Libra | Sign::Aquarius => TraitGroup::Air,
            Sign::Cancer | Sign::Scorpio | Sign::Pisces => TraitGroup::Water,
        }
    }
}

impl TraitGroup {
    /// Position in the compatibility tables
    pub(crate) fn index(&self) -> usize {
        match self {
            TraitGroup::Fire => 0,
            TraitGroup::Earth => 1,
            TraitGroup::Air => 2,
            TraitGroup::Water => 3,
        }
    }

    /// Get the group name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TraitGroup::Fire => "fire",
            TraitGroup::Earth => "earth",
            TraitGroup::Air => "air",
            TraitGroup::Water => "water",
        }
    }
}

/// Sign for a birth date, `None` when the date is unknown
pub fn derive_sign(birth_date: Option<BirthDate>) -> Option<Sign> {
    birth_date.map(|d| Sign::from_date(d.date()))
}

/// Trait group for a birth date, `None` when the date is unknown
pub fn derive_trait_group(birth_date: Option<BirthDate>) -> Option<TraitGroup> {
    derive_sign(birth_date).map(|s| s.group())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(month: u32, day: u32) -> Sign {
        Sign::from_month_day(month, day)
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(sign(1, 19), Sign::Capricorn);
        assert_eq!(sign(1, 20), Sign::Aquarius);
        assert_eq!(sign(2, 18), Sign::Aquarius);
        assert_eq!(sign(2, 19), Sign::Pisces);
        assert_eq!(sign(3, 20), Sign::Pisces);
        assert_eq!(sign(3, 21), Sign::Aries);
        assert_eq!(sign(4, 19), Sign::Aries);
        assert_eq!(sign(4, 20), Sign::Taurus);
        assert_eq!(sign(5, 21), Sign::Gemini);
        assert_eq!(sign(6, 20), Sign::Gemini);
        assert_eq!(sign(6, 21), Sign::Cancer);
        assert_eq!(sign(7, 22), Sign::Cancer);
        assert_eq!(sign(7, 23), Sign::Leo);
        assert_eq!(sign(8, 23), Sign::Virgo);
        assert_eq!(sign(9, 23), Sign::Libra);
        assert_eq!(sign(10, 22), Sign::Libra);
        assert_eq!(sign(10, 23), Sign::Scorpio);
        assert_eq!(sign(11, 21), Sign::Scorpio);
        assert_eq!(sign(11, 22), Sign::Sagittarius);
        assert_eq!(sign(12, 21), Sign::Sagittarius);
        assert_eq!(sign(12, 22), Sign::Capricorn);
        assert_eq!(sign(12, 31), Sign::Capricorn);
        assert_eq!(sign(1, 1), Sign::Capricorn);
    }

    #[test]
    fn test_three_signs_per_group() {
        let all = SIGN_STARTS.iter().map(|(_, s)| s.group());
        for group in [TraitGroup::Fire, TraitGroup::Earth, TraitGroup::Air, TraitGroup::Water] {
            assert_eq!(all.clone().filter(|g| *g == group).count(), 3);
        }
    }

    #[test]
    fn test_derive_from_date() {
        let leo = BirthDate::new(2006, 8, 1).unwrap();
        assert_eq!(derive_sign(Some(leo)), Some(Sign::Leo));
        assert_eq!(derive_trait_group(Some(leo)), Some(TraitGroup::Fire));
        assert_eq!(derive_trait_group(None), None);
    }

    #[test]
    fn test_leap_day_is_pisces() {
        let leap = NaiveDate::from_ymd_opt(2008, 2, 29).unwrap();
        assert_eq!(Sign::from_date(leap), Sign::Pisces);
    }
}
