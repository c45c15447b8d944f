use proptest::prelude::*;

use rewind_types::{BlockMeta, HexBytes, State, Timestamp};

proptest! {
    /// HexBytes Display output parses back to the same bytes.
    #[test]
    fn hex_bytes_display_parses_back(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let h = HexBytes::new(bytes.clone());
        let parsed = HexBytes::from_hex(&h.to_string()).unwrap();
        prop_assert_eq!(parsed.as_bytes(), &bytes[..]);
    }

    /// Display is always twice the byte length and upper-case.
    #[test]
    fn hex_bytes_display_shape(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let s = HexBytes::new(bytes.clone()).to_string();
        prop_assert_eq!(s.len(), bytes.len() * 2);
        prop_assert_eq!(s.to_uppercase(), s);
    }

    /// Timestamp ordering follows the nanosecond value.
    #[test]
    fn timestamp_ordering(a in any::<u64>(), b in any::<u64>()) {
        let ta = Timestamp::from_nanos(a);
        let tb = Timestamp::from_nanos(b);
        prop_assert_eq!(ta <= tb, a <= b);
    }

    /// from_secs agrees with as_secs for representable values.
    #[test]
    fn timestamp_secs(secs in 0u64..u64::MAX / 1_000_000_000) {
        prop_assert_eq!(Timestamp::from_secs(secs).as_secs(), secs);
    }

    /// State records survive the bincode encoding the LMDB backend uses.
    #[test]
    fn state_bincode_preserves_heights(
        height in 1i64..i64::MAX / 2,
        app_hash in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let state = State {
            last_block_height: height,
            app_hash: HexBytes::new(app_hash),
            ..State::default()
        };
        let encoded = bincode::serialize(&state).unwrap();
        let decoded: State = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, state);
    }

    /// Block metadata records survive bincode as well.
    #[test]
    fn block_meta_bincode(height in 1i64..1_000_000, txs in 0u64..10_000) {
        let mut meta = BlockMeta::default();
        meta.header.height = height;
        meta.num_txs = txs;
        let decoded: BlockMeta = bincode::deserialize(&bincode::serialize(&meta).unwrap()).unwrap();
        prop_assert_eq!(decoded.height(), height);
        prop_assert_eq!(decoded.num_txs, txs);
    }
}
