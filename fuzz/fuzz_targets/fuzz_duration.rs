#![no_main]

use libfuzzer_sys::fuzz_target;
use tagconf::coerce::{parse_duration, parse_duration_nanos, parse_time_delta};

fuzz_target!(|data: &str| {
    let nanos = parse_duration_nanos(data);

    // The signed delta parser agrees with the nanosecond parser
    match (&nanos, parse_time_delta(data)) {
        (Ok(n), Ok(delta)) => assert_eq!(delta.num_nanoseconds(), Some(*n)),
        (Err(_), Err(_)) => {}
        (left, right) => panic!("parsers disagree on {data:?}: {left:?} vs {right:?}"),
    }

    // std::time::Duration only accepts the non-negative results
    match (nanos, parse_duration(data)) {
        (Ok(n), Ok(d)) => {
            assert!(n >= 0);
            assert_eq!(d.as_nanos(), u128::try_from(n).unwrap());
        }
        (Ok(n), Err(_)) => assert!(n < 0),
        (Err(_), result) => assert!(result.is_err()),
    }
});
