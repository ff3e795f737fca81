// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Day grouping of the message snapshot for presentation.
//!
//! Grouping is a stable partition: group order follows the first appearance
//! of each day label and messages keep their snapshot order inside a group.
//! Nothing is re-sorted by timestamp.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use relaychat_core::{ChatMessage, DayGroup, GroupedView, RelayChatError};

/// Label for messages whose `date` is not a number.
pub const INVALID_DATE_LABEL: &str = "Invalid date";

const DAY_FORMAT: &str = "%A %d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M";

/// Fixed UTC offset used for day boundaries.
pub fn day_offset(minutes: i32) -> Result<FixedOffset, RelayChatError> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt).ok_or_else(|| {
        RelayChatError::Config(format!("day offset of {minutes} minutes is out of range"))
    })
}

fn local_time(message: &ChatMessage, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let millis = message.timestamp_millis()?;
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&offset))
}

/// `Thursday 01/01/1970` style label for the message's calendar day.
pub fn day_label(message: &ChatMessage, offset: FixedOffset) -> String {
    match local_time(message, offset) {
        Some(at) => at.format(DAY_FORMAT).to_string(),
        None => INVALID_DATE_LABEL.to_string(),
    }
}

/// `HH:MM` wall-clock time of the message, if its date parses.
pub fn time_label(message: &ChatMessage, offset: FixedOffset) -> Option<String> {
    local_time(message, offset).map(|at| at.format(TIME_FORMAT).to_string())
}

/// Partitions `messages` into day groups.
pub fn group_by_day(messages: &[ChatMessage], offset: FixedOffset) -> GroupedView {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for message in messages {
        let label = day_label(message, offset);
        match index.get(&label) {
            Some(&i) => groups[i].messages.push(message.clone()),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(DayGroup {
                    label,
                    messages: vec![message.clone()],
                });
            }
        }
    }

    GroupedView { groups }
}
