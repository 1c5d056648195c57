#![no_main]

use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use pgjsonb::testutil::encode;
use pgjsonb::Value;
use quickcheck::{Arbitrary, Gen};

fuzz_target!(|data: &[u8]| {
    let _ = pgjsonb::decode(data);
});

/// Replaces the fuzzer's raw bytes with a structurally valid encoded
/// document on roughly a quarter of mutations, so the corpus doesn't only
/// probe the early rejection paths that mutating raw bytes tends to land on
/// (`Truncated`, `BadRootHeader`) and actually reaches container and
/// numeric decoding.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if seed % 4 == 0 {
        let mut gen = Gen::new(32);
        let encoded = encode(&Value::arbitrary(&mut gen));
        let len = encoded.len().min(max_size);
        data[..len].copy_from_slice(&encoded[..len]);
        len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});
