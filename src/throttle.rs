use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Window in which a detection identical to the last delivered one is dropped.
pub const EVENT_THROTTLE: Duration = Duration::from_millis(500);

/// Copy of `value` with object keys sorted at every level, so equal payloads
/// serialise equally whatever order their keys arrived in.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonical(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Clone)]
struct ThrottleRecord {
    payload: String,
    delivered_at: Instant,
}

/// Collapses bursts of identical detector events. Each event kind keeps its
/// own record, so a burst on one kind never delays another.
#[derive(Debug)]
pub struct EventThrottle<K> {
    window: Duration,
    records: HashMap<K, ThrottleRecord>,
}

impl<K: Eq + Hash + Copy> EventThrottle<K> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            records: HashMap::new(),
        }
    }

    /// Calls `deliver` unless the same payload was delivered for `kind` less
    /// than one window ago. Returns whether the event went through.
    pub fn deliver<F>(&mut self, kind: K, payload: &Value, now: Instant, deliver: F) -> bool
    where
        F: FnOnce(&Value),
    {
        let serialized = canonical(payload).to_string();

        if let Some(last) = self.records.get(&kind) {
            if last.payload == serialized
                && now.saturating_duration_since(last.delivered_at) < self.window
            {
                return false;
            }
        }

        deliver(payload);
        self.records.insert(
            kind,
            ThrottleRecord {
                payload: serialized,
                delivered_at: now,
            },
        );
        true
    }

    pub fn is_tracking(&self, kind: K) -> bool {
        self.records.contains_key(&kind)
    }
}
