#![no_main]

use libfuzzer_sys::fuzz_target;

// Store records are bincode-encoded; decoding a corrupt record must fail,
// never panic.
fuzz_target!(|data: &[u8]| {
    let _ = bincode::deserialize::<rewind_types::State>(data);
    let _ = bincode::deserialize::<rewind_types::BlockMeta>(data);
    let _ = bincode::deserialize::<rewind_types::ValidatorSet>(data);
    let _ = bincode::deserialize::<rewind_types::ConsensusParams>(data);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = rewind_types::HexBytes::from_hex(s);
    }
});
