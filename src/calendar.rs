//! Service days for transit schedule lookups
//!
//! Tiles record their creation date as a day count from a fixed pivot date.
//! Schedules are expressed relative to that date, so a query date is turned
//! into a day offset plus a day-of-week bit before checking validity.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Day-of-week bits, Sunday first
pub mod dow {
    pub const SUNDAY: u8 = 1;
    pub const MONDAY: u8 = 2;
    pub const TUESDAY: u8 = 4;
    pub const WEDNESDAY: u8 = 8;
    pub const THURSDAY: u8 = 16;
    pub const FRIDAY: u8 = 32;
    pub const SATURDAY: u8 = 64;
    pub const ALL: u8 = 0x7f;
}

/// Last day offset a schedule's day mask can express
pub const MAX_SERVICE_DAY: u32 = 63;

pub fn pivot_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap_or_default()
}

/// Calendar date of a tile's `date_created` field
pub fn tile_date(date_created: u32) -> Option<NaiveDate> {
    pivot_date().checked_add_days(chrono::Days::new(date_created as u64))
}

pub fn dow_mask(date: NaiveDate) -> u8 {
    1 << date.weekday().num_days_from_sunday()
}

/// Arguments of the schedule validity predicate for one query date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceDay {
    /// Days since the tile was created. Offsets past `MAX_SERVICE_DAY` are
    /// kept as they are and fail every schedule's end day.
    pub day: u32,
    pub dow: u8,
    /// Query date precedes the tile's creation date
    pub date_before_tile: bool,
}

impl ServiceDay {
    pub fn new(day: u32, dow: u8, date_before_tile: bool) -> Self {
        Self {
            day,
            dow,
            date_before_tile,
        }
    }

    pub fn for_date(date_created: u32, date: NaiveDate) -> Self {
        let dow = dow_mask(date);
        let Some(created) = tile_date(date_created) else {
            return Self::new(0, dow, true);
        };
        if date < created {
            return Self::new(0, dow, true);
        }
        let day = u32::try_from((date - created).num_days()).unwrap_or(u32::MAX);
        Self::new(day, dow, false)
    }
}
