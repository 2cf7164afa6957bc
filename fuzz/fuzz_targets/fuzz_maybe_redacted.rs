#![no_main]

use libfuzzer_sys::fuzz_target;
use tagconf::MaybeRedacted;

fuzz_target!(|data: (String, bool)| {
    let (value, is_secret) = data;

    let redacted = MaybeRedacted::new(value.clone(), is_secret);
    let shown = format!("{redacted}");
    let debugged = format!("{redacted:?}");

    if is_secret {
        assert!(redacted.is_redacted());
        assert!(redacted.as_plain().is_none());
        assert_eq!(shown, "<redacted>");
        assert_eq!(debugged, "<redacted>");
    } else {
        assert!(!redacted.is_redacted());
        assert_eq!(redacted.as_plain(), Some(value.as_str()));
    }
});
