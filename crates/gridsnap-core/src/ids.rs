//! Box id generation.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of the random suffix.
const SUFFIX_LEN: usize = 9;

/// Last timestamp handed out, so stamps never repeat within the process.
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Next strictly increasing millisecond stamp.
fn next_stamp() -> u64 {
    let now = now_millis();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last.saturating_add(1));
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Generate a box id of the form `box-<millis>-<9 lowercase hex chars>`.
pub fn generate_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("box-{}-{}", next_stamp(), &random[..SUFFIX_LEN])
}
