#![no_main]

use economy_abm::config::ModelConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_yaml::from_str::<ModelConfig>(s);
    }
});
