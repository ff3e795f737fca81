// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side message id generation.
//!
//! Ids look like `MSG-17000-aZ09xy-00000000`: the prefix, the first half of
//! the millisecond timestamp, six random alphanumerics, then the second half.

use std::collections::HashSet;

use rand::distributions::Alphanumeric;
use rand::Rng;
use relaychat_core::MessageId;

/// Number of random characters between the timestamp halves.
pub const RANDOM_LEN: usize = 6;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Assembles an id from its parts. An empty prefix is omitted.
pub fn format_message_id(prefix: &str, millis: i64, random: &str) -> String {
    let stamp = millis.to_string();
    let middle = stamp.len().div_ceil(2);
    let (head, tail) = stamp.split_at(middle);
    if prefix.is_empty() {
        format!("{head}-{random}-{tail}")
    } else {
        format!("{prefix}-{head}-{random}-{tail}")
    }
}

/// Generates message ids that never repeat within one generator.
///
/// Ids minted in the same millisecond are remembered until the clock moves
/// on, and a colliding random part is redrawn.
#[derive(Debug)]
pub struct MessageIdGenerator {
    prefix: String,
    current_millis: i64,
    issued: HashSet<String>,
}

impl MessageIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            current_millis: i64::MIN,
            issued: HashSet::new(),
        }
    }

    /// Mints an id stamped with the current time.
    pub fn generate(&mut self) -> MessageId {
        self.generate_at(now_millis())
    }

    /// Mints an id stamped with `millis`.
    pub fn generate_at(&mut self, millis: i64) -> MessageId {
        if millis != self.current_millis {
            self.current_millis = millis;
            self.issued.clear();
        }

        let mut rng = rand::thread_rng();
        loop {
            let random: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(RANDOM_LEN)
                .map(char::from)
                .collect();
            let id = format_message_id(&self.prefix, millis, &random);
            if self.issued.insert(id.clone()) {
                return MessageId(id);
            }
        }
    }
}
