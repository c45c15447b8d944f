#![no_main]

use libfuzzer_sys::fuzz_target;

use rewind_privval::LastSignState;

fuzz_target!(|data: &[u8]| {
    // Parse arbitrary bytes as a last-sign-state file. Step values outside
    // 0..=3 and malformed hex must surface as errors.
    if let Ok(mut state) = serde_json::from_slice::<LastSignState>(data) {
        state.clear();
        assert!(state.is_zero());
    }
});
