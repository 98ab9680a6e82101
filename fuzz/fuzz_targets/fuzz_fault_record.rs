//! Fuzz target for loose fault/fold row parsing.
//!
//! Arbitrary JSON must either parse into a record or return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use m2l_common::{EventKey, FaultRecord, FoldRecord};

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let _ = FaultRecord::from_value(&value);
    let _ = FoldRecord::from_value(&value);
    let _ = EventKey::try_from(&value);
});
