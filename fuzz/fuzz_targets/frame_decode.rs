//! Fuzz target for the wire codec.
//!
//! This fuzzer feeds arbitrary text through both decode paths to find:
//! - Parser crashes or panics
//! - Payload shapes that bypass validation
//! - Inputs that are neither accepted nor rejected
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Decoding arbitrary text must produce a value or an error,
        // never a panic.
        let _ = banter_proto::decode(text);
        let _ = banter_proto::ClientIntent::decode(text);
    }
});
