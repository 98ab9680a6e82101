//! Fuzz target for registry snapshot loading.
//!
//! A snapshot that parses must either restore cleanly or be rejected.

#![no_main]

use libfuzzer_sys::fuzz_target;
use m2l_config::RegistryConfig;
use m2l_core::{DeformationRegistry, RegistrySnapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(snapshot) = RegistrySnapshot::from_json(text) {
        if let Ok(registry) = DeformationRegistry::from_snapshot(snapshot, &RegistryConfig::default()) {
            let _ = registry.faults_for_export();
        }
    }
});
