#![no_main]

use adoption_simulator::models::{coerce_number, EditableField, SimulationParams};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        assert!(coerce_number(raw).is_finite());
        let params = SimulationParams::default();
        for field in EditableField::ALL {
            let edited = params.with_edit(field, raw);
            assert_eq!(edited.step, params.step);
        }
    }
});
