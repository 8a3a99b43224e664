//! Transit records: departures, stops, routes and schedules
//!
//! Departure (32 bytes), sorted by line_id then departure_time:
//!   line_id:         u32
//!   trip_id:         u32
//!   route_index:     u16
//!   schedule_index:  u16
//!   block_id:        u32
//!   headsign_offset: u32   // into the text pool
//!   departure_time:  u32   // seconds from local midnight
//!   elapsed_time:    u32   // seconds until arrival at the next stop
//!   flags:           u8    // bit0=wheelchair accessible, bit1=bicycle accessible
//!   reserved:        [u8; 3]
//!
//! Stop (16 bytes):
//!   one_stop_offset: u32
//!   name_offset:     u32
//!   flags:           u32
//!   reserved:        [u8; 4]
//!
//! Route (40 bytes):
//!   route_type:      u8
//!   reserved:        [u8; 3]
//!   one_stop_offset, op_one_stop_offset, op_name_offset, op_website_offset,
//!   route_color, route_text_color, short_name_offset, long_name_offset,
//!   desc_offset:     u32 each
//!
//! Schedule (16 bytes):
//!   days:            u64   // bit n = service runs n days after tile creation
//!   days_of_week:    u8    // Sunday = bit 0
//!   end_day:         u8    // last day (since tile creation) the schedule runs
//!   reserved:        [u8; 6]

use serde::Serialize;

use super::le::{put, u16_at, u32_at, u64_at, u8_at};

pub const DEPARTURE_SIZE: usize = 32;
pub const STOP_SIZE: usize = 16;
pub const ROUTE_SIZE: usize = 40;
pub const SCHEDULE_SIZE: usize = 16;

const WHEELCHAIR: u8 = 1 << 0;
const BICYCLE: u8 = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransitDeparture {
    pub line_id: u32,
    pub trip_id: u32,
    pub route_index: u16,
    pub schedule_index: u16,
    pub block_id: u32,
    pub headsign_offset: u32,
    pub departure_time: u32,
    pub elapsed_time: u32,
    pub wheelchair_accessible: bool,
    pub bicycle_accessible: bool,
}

impl TransitDeparture {
    pub fn decode(record: &[u8]) -> Self {
        let flags = u8_at(record, 28);
        Self {
            line_id: u32_at(record, 0),
            trip_id: u32_at(record, 4),
            route_index: u16_at(record, 8),
            schedule_index: u16_at(record, 10),
            block_id: u32_at(record, 12),
            headsign_offset: u32_at(record, 16),
            departure_time: u32_at(record, 20),
            elapsed_time: u32_at(record, 24),
            wheelchair_accessible: flags & WHEELCHAIR != 0,
            bicycle_accessible: flags & BICYCLE != 0,
        }
    }

    pub fn encode(&self) -> [u8; DEPARTURE_SIZE] {
        let mut buf = [0u8; DEPARTURE_SIZE];
        put(&mut buf, 0, &self.line_id.to_le_bytes());
        put(&mut buf, 4, &self.trip_id.to_le_bytes());
        put(&mut buf, 8, &self.route_index.to_le_bytes());
        put(&mut buf, 10, &self.schedule_index.to_le_bytes());
        put(&mut buf, 12, &self.block_id.to_le_bytes());
        put(&mut buf, 16, &self.headsign_offset.to_le_bytes());
        put(&mut buf, 20, &self.departure_time.to_le_bytes());
        put(&mut buf, 24, &self.elapsed_time.to_le_bytes());
        let mut flags = 0;
        if self.wheelchair_accessible {
            flags |= WHEELCHAIR;
        }
        if self.bicycle_accessible {
            flags |= BICYCLE;
        }
        buf[28] = flags;
        buf
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransitStop {
    pub one_stop_offset: u32,
    pub name_offset: u32,
    pub flags: u32,
}

impl TransitStop {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            one_stop_offset: u32_at(record, 0),
            name_offset: u32_at(record, 4),
            flags: u32_at(record, 8),
        }
    }

    pub fn encode(&self) -> [u8; STOP_SIZE] {
        let mut buf = [0u8; STOP_SIZE];
        put(&mut buf, 0, &self.one_stop_offset.to_le_bytes());
        put(&mut buf, 4, &self.name_offset.to_le_bytes());
        put(&mut buf, 8, &self.flags.to_le_bytes());
        buf
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransitRoute {
    pub route_type: u8,
    pub one_stop_offset: u32,
    pub op_one_stop_offset: u32,
    pub op_name_offset: u32,
    pub op_website_offset: u32,
    pub route_color: u32,
    pub route_text_color: u32,
    pub short_name_offset: u32,
    pub long_name_offset: u32,
    pub desc_offset: u32,
}

impl TransitRoute {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            route_type: u8_at(record, 0),
            one_stop_offset: u32_at(record, 4),
            op_one_stop_offset: u32_at(record, 8),
            op_name_offset: u32_at(record, 12),
            op_website_offset: u32_at(record, 16),
            route_color: u32_at(record, 20),
            route_text_color: u32_at(record, 24),
            short_name_offset: u32_at(record, 28),
            long_name_offset: u32_at(record, 32),
            desc_offset: u32_at(record, 36),
        }
    }

    pub fn encode(&self) -> [u8; ROUTE_SIZE] {
        let mut buf = [0u8; ROUTE_SIZE];
        buf[0] = self.route_type;
        let fields = [
            self.one_stop_offset,
            self.op_one_stop_offset,
            self.op_name_offset,
            self.op_website_offset,
            self.route_color,
            self.route_text_color,
            self.short_name_offset,
            self.long_name_offset,
            self.desc_offset,
        ];
        for (i, value) in fields.iter().enumerate() {
            put(&mut buf, 4 + i * 4, &value.to_le_bytes());
        }
        buf
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransitSchedule {
    pub days: u64,
    pub days_of_week: u8,
    pub end_day: u8,
}

impl TransitSchedule {
    pub fn decode(record: &[u8]) -> Self {
        Self {
            days: u64_at(record, 0),
            days_of_week: u8_at(record, 8),
            end_day: u8_at(record, 9),
        }
    }

    pub fn encode(&self) -> [u8; SCHEDULE_SIZE] {
        let mut buf = [0u8; SCHEDULE_SIZE];
        put(&mut buf, 0, &self.days.to_le_bytes());
        buf[8] = self.days_of_week;
        buf[9] = self.end_day;
        buf
    }

    /// Whether service runs on `day` (days since tile creation) with weekday
    /// mask `dow`.
    ///
    /// Dates before the tile's creation date have no day bit to consult, so
    /// `date_before_tile` accepts them on the weekday mask alone.
    pub fn is_valid(&self, day: u32, dow: u8, date_before_tile: bool) -> bool {
        if self.days_of_week & dow == 0 || day > self.end_day as u32 {
            return false;
        }
        date_before_tile || (day < 64 && self.days & (1u64 << day) != 0)
    }
}
