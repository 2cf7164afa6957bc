#![no_main]

use std::collections::HashMap;
use std::path::PathBuf;

use libfuzzer_sys::fuzz_target;
use tagconf::{Coerce, set_field};

fuzz_target!(|data: &str| {
    // Coercion must never panic, whatever the destination kind
    let _ = i8::coerce(data);
    let _ = i64::coerce(data);
    let _ = u8::coerce(data);
    let _ = u128::coerce(data);
    let _ = f32::coerce(data);
    let _ = bool::coerce(data);
    let _ = Vec::<u32>::coerce(data);
    let _ = HashMap::<String, i16>::coerce(data);
    let _ = Option::<Box<u64>>::coerce(data);

    // Strings and paths accept everything verbatim
    assert_eq!(String::coerce(data).unwrap(), data);
    assert_eq!(PathBuf::coerce(data).unwrap(), PathBuf::from(data));
    assert_eq!(Vec::<u8>::coerce(data).unwrap(), data.as_bytes());

    // A failed set leaves the destination unchanged
    let mut dest: u16 = 0xBEEF;
    if set_field(data, &mut dest).is_err() {
        assert_eq!(dest, 0xBEEF);
    }

    // Accepted integers fit the destination
    if let Ok(n) = i8::coerce(data) {
        assert_eq!(i64::coerce(data).unwrap(), i64::from(n));
    }
});
