//! Decodes a `jsonb::bytea` payload given as a `\x`-prefixed hex string, the
//! form `psql` prints for a bytea column, and pretty-prints the result.
//!
//! Run with
//!
//! ```bash
//! cargo run -p pgjsonb --example decode_bytea -- '\x0100004003000000616263'
//! ```

use pgjsonb::decode;

fn parse_hex_bytea(input: &str) -> Vec<u8> {
    let hex = input.strip_prefix(r"\x").unwrap_or(input);
    assert!(hex.len() % 2 == 0, "hex bytea must have an even number of digits");

    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("valid hex digit pair"))
        .collect()
}

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r"\x0100004003000000616263".to_string());

    let bytes = parse_hex_bytea(&input);
    match decode(&bytes) {
        Ok(value) => println!("{value}"),
        Err(err) => {
            eprintln!("failed to decode jsonb bytea: {err}");
            std::process::exit(1);
        }
    }
}
