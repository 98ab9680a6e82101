//! Fuzz target for registry.json / registry.toml parsing.
//!
//! Parsing and validation should never panic, only return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use m2l_config::{ConfigFormat, RegistryConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for format in [ConfigFormat::Json, ConfigFormat::Toml] {
            if let Ok(config) = RegistryConfig::parse(text, format) {
                let _ = config.validate();
            }
        }
    }
});
