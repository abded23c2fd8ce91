#![no_main]

use eth_wire::protocol::{MessageCodec, ProtocolVersion};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let version = ProtocolVersion::ALL[usize::from(selector >> 6)];
    let code = u64::from(selector & 0x1f);
    let codec = MessageCodec::new(version);

    if let Ok(packet) = codec.decode(code, payload) {
        let (encoded_code, encoded) = codec.encode(&packet).expect("decoded packet re-encodes");
        assert_eq!(encoded_code, code);
        assert_eq!(&encoded[..], payload);
    }
    let _ = codec.decode_relay(code, payload);
});
