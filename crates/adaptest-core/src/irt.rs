//! Three-parameter logistic (3PL) response model.
//!
//! Probability of a correct answer, Fisher information, and the standard
//! error of measurement derived from them. All functions are pure; the
//! optional [`IrtCache`] memoises them by quantised arguments and can be
//! shared by every session in the process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::model::IrtParams;

/// Theta is clamped to this magnitude before evaluation.
pub const THETA_LIMIT: f64 = 5.0;
pub const MIN_DISCRIMINATION: f64 = 0.1;
pub const MAX_DISCRIMINATION: f64 = 3.0;
pub const MAX_GUESSING: f64 = 0.4;
/// Exponents beyond this magnitude saturate instead of calling `exp`.
pub const MAX_EXPONENT: f64 = 700.0;
/// Ceiling on the information a single item can contribute.
pub const MAX_INFORMATION: f64 = 100.0;
/// SEM reported when nothing is known yet.
pub const UNKNOWN_SEM: f64 = 1.0;

/// Probability of a correct response under the 3PL model, in `[c, 1]`.
pub fn probability_correct(theta: f64, b: f64, a: f64, c: f64) -> f64 {
    let theta = theta.clamp(-THETA_LIMIT, THETA_LIMIT);
    let a = a.clamp(MIN_DISCRIMINATION, MAX_DISCRIMINATION);
    let c = c.clamp(0.0, MAX_GUESSING);

    let exponent = -a * (theta - b);
    if exponent > MAX_EXPONENT {
        return c;
    }
    if exponent < -MAX_EXPONENT {
        return 1.0;
    }
    c + (1.0 - c) / (1.0 + exponent.exp())
}

/// Fisher information of one item at `theta`.
///
/// Zero when the item has no discriminating power left (`p <= c` or `p >= 1`).
pub fn information(theta: f64, b: f64, a: f64, c: f64) -> f64 {
    let p = probability_correct(theta, b, a, c);
    let a = a.clamp(MIN_DISCRIMINATION, MAX_DISCRIMINATION);
    let c = c.clamp(0.0, MAX_GUESSING);

    if p <= c || p >= 1.0 {
        return 0.0;
    }
    let p_star = (p - c) / (1.0 - c);
    let info = a * a * p_star * (1.0 - p_star) / ((1.0 - c) * (1.0 - c));
    info.min(MAX_INFORMATION)
}

/// Sum of item information at `theta`.
pub fn test_information(theta: f64, items: &[IrtParams]) -> f64 {
    items
        .iter()
        .map(|i| information(theta, i.difficulty, i.discrimination, i.guessing))
        .sum()
}

/// `1 / sqrt(total information)`, or [`UNKNOWN_SEM`] when there is none.
pub fn standard_error_of_measurement(theta: f64, items: &[IrtParams]) -> f64 {
    sem_from_information(test_information(theta, items))
}

pub(crate) fn sem_from_information(total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        UNKNOWN_SEM
    } else {
        1.0 / total.sqrt()
    }
}

// ---------------------------------------------------------------------------
// Shared memoisation
// ---------------------------------------------------------------------------

/// Decimal places inputs are rounded to before lookup.
const CACHE_PRECISION: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Quantity {
    Probability,
    Information,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    quantity: Quantity,
    theta: i64,
    b: i64,
    a: i64,
    c: i64,
}

fn quantize(x: f64) -> i64 {
    (x * CACHE_PRECISION).round() as i64
}

fn dequantize(q: i64) -> f64 {
    q as f64 / CACHE_PRECISION
}

/// Bounded, thread-safe memo of [`probability_correct`] and [`information`].
///
/// Keys are the numeric arguments rounded to four decimals, never anything
/// session-specific, so one cache can serve every concurrent session. The
/// whole map is dropped when it reaches capacity.
#[derive(Debug)]
pub struct IrtCache {
    entries: Mutex<HashMap<CacheKey, f64>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl IrtCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity.min(4096))),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn probability(&self, theta: f64, item: &IrtParams) -> f64 {
        self.lookup(Quantity::Probability, theta, item)
    }

    pub fn information(&self, theta: f64, item: &IrtParams) -> f64 {
        self.lookup(Quantity::Information, theta, item)
    }

    /// SEM at `theta` over the given items, using cached information.
    pub fn standard_error(&self, theta: f64, items: &[IrtParams]) -> f64 {
        let total: f64 = items.iter().map(|i| self.information(theta, i)).sum();
        sem_from_information(total)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, f64>> {
        // Entries are plain numbers, a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, quantity: Quantity, theta: f64, item: &IrtParams) -> f64 {
        let key = CacheKey {
            quantity,
            theta: quantize(theta),
            b: quantize(item.difficulty),
            a: quantize(item.discrimination),
            c: quantize(item.guessing),
        };

        if let Some(&value) = self.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return value;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let (theta, b, a, c) = (
            dequantize(key.theta),
            dequantize(key.b),
            dequantize(key.a),
            dequantize(key.c),
        );
        let value = match quantity {
            Quantity::Probability => probability_correct(theta, b, a, c),
            Quantity::Information => information(theta, b, a, c),
        };

        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            tracing::debug!("irt cache full ({} entries), clearing", entries.len());
            entries.clear();
        }
        entries.insert(key, value);
        value
    }
}

impl Default for IrtCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}
