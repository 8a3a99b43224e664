//! Departure lookups over the line-sorted departure array

use rustc_hash::FxHashMap;
use tracing::debug;

use super::search::equal_range;
use super::GraphTile;
use crate::calendar::ServiceDay;
use crate::error::Result;
use crate::formats::TransitDeparture;

/// Accessibility requirements a departure must meet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepartureFilter {
    pub wheelchair: bool,
    pub bicycle: bool,
}

impl DepartureFilter {
    pub fn accepts(&self, departure: &TransitDeparture) -> bool {
        (!self.wheelchair || departure.wheelchair_accessible)
            && (!self.bicycle || departure.bicycle_accessible)
    }
}

impl GraphTile {
    pub(super) fn departure_at(&self, index: u32) -> Option<TransitDeparture> {
        self.layout
            .departures
            .record(&self.bytes, index)
            .map(TransitDeparture::decode)
    }

    fn line_run(&self, line_id: u32) -> Option<std::ops::Range<u32>> {
        let count = self.layout.departures.count();
        if count == 0 {
            return None;
        }
        equal_range(count, Some(line_id), |i| self.departure_at(i).map(|d| d.line_id))
    }

    /// First departure of `line_id` at or after `current_time` (seconds from
    /// midnight) whose schedule runs on `service_day`.
    ///
    /// Only the given day is searched; a line with no later departure that day
    /// gives `None` rather than the first departure of the next day.
    pub fn next_departure(
        &self,
        line_id: u32,
        current_time: u32,
        service_day: &ServiceDay,
        filter: DepartureFilter,
    ) -> Result<Option<TransitDeparture>> {
        let Some(run) = self.line_run(line_id) else {
            debug!(tile = %self.id, line_id, "no departures for line");
            return Ok(None);
        };

        // any departure in the run at or after the current time, then back
        // up to the earliest such departure
        let after = |i: u32| self.departure_at(i).map(|d| d.departure_time >= current_time);
        let Some(mut start) = partition_point(run.clone(), |i| after(i) == Some(false)) else {
            debug!(tile = %self.id, line_id, current_time, "no more departures found");
            return Ok(None);
        };
        while start > run.start && after(start - 1) == Some(true) {
            start -= 1;
        }

        for i in start..run.end {
            let Some(departure) = self.departure_at(i) else {
                break;
            };
            if departure.departure_time < current_time || !filter.accepts(&departure) {
                continue;
            }
            let schedule = self.transit_schedule(departure.schedule_index as u32)?;
            if schedule.is_valid(
                service_day.day,
                service_day.dow,
                service_day.date_before_tile,
            ) {
                return Ok(Some(departure));
            }
        }

        debug!(tile = %self.id, line_id, current_time, "no more departures found");
        Ok(None)
    }

    /// Departure of `line_id` belonging to trip `trip_id`
    pub fn transit_departure(&self, line_id: u32, trip_id: u32) -> Option<TransitDeparture> {
        let found = self
            .line_run(line_id)
            .into_iter()
            .flatten()
            .filter_map(|i| self.departure_at(i))
            .find(|d| d.trip_id == trip_id);
        if found.is_none() {
            debug!(tile = %self.id, line_id, trip_id, "no departure found for trip");
        }
        found
    }

    /// One departure per line id, the earliest of each line
    pub fn transit_departures(&self) -> FxHashMap<u32, TransitDeparture> {
        let count = self.layout.departures.count();
        let mut departures = FxHashMap::default();
        departures.reserve(count as usize);
        for departure in (0..count).filter_map(|i| self.departure_at(i)) {
            departures.entry(departure.line_id).or_insert(departure);
        }
        departures
    }
}

/// First ordinal in `range` for which `before` is false, or `None` if it holds
/// for the whole range. `before` must be true for a prefix of the range.
fn partition_point(range: std::ops::Range<u32>, before: impl Fn(u32) -> bool) -> Option<u32> {
    let (mut low, mut high) = (range.start, range.end);
    while low < high {
        let mid = low + (high - low) / 2;
        if before(mid) {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    (low < range.end).then_some(low)
}
