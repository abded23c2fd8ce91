#![no_main]

use eth_wire::core::rlp;
use eth_wire::core::value::Value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything the strict decoder accepts must re-encode to the same bytes
    if let Ok(value) = rlp::decode_exact::<Value>(data) {
        assert_eq!(&value.to_bytes()[..], data);
    }
});
