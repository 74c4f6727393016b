//! Transient visual states with an explicit expiry.
//!
//! The host passes `now_ms` into every time-sensitive call, so expiry is a
//! pure function of the supplied clock and tests never race a real timer.

/// A value that stops being visible at `expires_at_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expiring<T> {
    value: T,
    expires_at_ms: f64,
}

impl<T> Expiring<T> {
    pub fn new(value: T, now_ms: f64, duration_ms: f64) -> Self {
        Self {
            value,
            expires_at_ms: now_ms + duration_ms.max(0.0),
        }
    }

    pub fn is_live(&self, now_ms: f64) -> bool {
        now_ms < self.expires_at_ms
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn expires_at_ms(&self) -> f64 {
        self.expires_at_ms
    }
}

/// Holds at most one [`Expiring`] value.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSlot<T>(Option<Expiring<T>>);

impl<T> Default for TimedSlot<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> TimedSlot<T> {
    pub fn set(&mut self, value: T, now_ms: f64, duration_ms: f64) {
        self.0 = Some(Expiring::new(value, now_ms, duration_ms));
    }

    /// The value, if it has not expired at `now_ms`.
    pub fn get(&self, now_ms: f64) -> Option<&T> {
        self.0
            .as_ref()
            .filter(|e| e.is_live(now_ms))
            .map(Expiring::value)
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Drop the value if it has expired. Returns `true` if something was
    /// dropped.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        match &self.0 {
            Some(e) if !e.is_live(now_ms) => {
                self.0 = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<f64> {
        self.0.as_ref().map(Expiring::expires_at_ms)
    }
}
