use std::collections::BTreeSet;

use chrono::NaiveDate;

use shared_config::AppConfig;

use crate::models::{RawBookingRecord, ServiceKind};

/// The business day's slot parameters. Recomputing the labels is cheap and
/// keeps the grid stateless.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    pub open: String,
    pub close: String,
    pub step_minutes: u32,
}

impl SlotGrid {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            open: config.open_time.clone(),
            close: config.close_time.clone(),
            step_minutes: config.slot_step_minutes,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        generate_slots(&self.open, &self.close, self.step_minutes)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels().iter().any(|s| s == label)
    }
}

/// Every slot label from `open` to `close` inclusive, stepping by
/// `step_minutes`. Caller contract violations (open after close, zero step,
/// unparseable labels) produce an empty grid rather than an error.
pub fn generate_slots(open: &str, close: &str, step_minutes: u32) -> Vec<String> {
    let (open_m, close_m) = match (parse_minutes(open), parse_minutes(close)) {
        (Some(o), Some(c)) => (o, c),
        _ => return vec![],
    };

    if step_minutes == 0 || open_m > close_m {
        return vec![];
    }

    let mut slots = Vec::new();
    let mut current = open_m;
    while current <= close_m {
        slots.push(format_label(current));
        current += step_minutes;
    }

    slots
}

/// The set of slot labels claimed on `date` by active bookings, optionally
/// narrowed to one service. Records with no usable time are skipped.
pub fn extract_occupied(
    raw: &[RawBookingRecord],
    date: NaiveDate,
    service: Option<ServiceKind>,
) -> BTreeSet<String> {
    raw.iter()
        .filter(|record| record.date == Some(date))
        .filter(|record| service.map_or(true, |s| record.service == Some(s)))
        .filter(|record| record.is_active())
        .filter_map(|record| record.time_label())
        .collect()
}

/// `all` minus `occupied`, in `all`'s order. When a record is being edited
/// its own current slot stays offered even though it is occupied by itself;
/// the result never contains duplicates.
pub fn available_slots(
    all: &[String],
    occupied: &BTreeSet<String>,
    editing_current: Option<&str>,
) -> Vec<String> {
    let mut result: Vec<String> = all
        .iter()
        .filter(|slot| !occupied.contains(*slot))
        .cloned()
        .collect();

    if let Some(current) = editing_current {
        if !result.iter().any(|slot| slot == current) {
            result.insert(0, current.to_string());
        }
    }

    let mut seen = BTreeSet::new();
    result.retain(|slot| seen.insert(slot.clone()));

    result
}

fn parse_minutes(label: &str) -> Option<u32> {
    let (hours, minutes) = label.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;

    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}

fn format_label(total_minutes: u32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}
