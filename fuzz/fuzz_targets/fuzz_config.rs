#![no_main]

use adoption_simulator::config::AppConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = AppConfig::from_toml_str(text);
    }
});
