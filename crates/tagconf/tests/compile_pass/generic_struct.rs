//! Test that generic structs derive with their bounds intact.

use tagconf::{Coerce, Configure};

#[derive(Configure, Default)]
struct Setting<T>
where
    T: Coerce + std::fmt::Debug + 'static,
{
    #[config(envconfig = "SETTING_VALUE")]
    value: T,
}

fn main() {
    assert_eq!(Setting::<u32>::fields()[0].key, Some("SETTING_VALUE"));
    assert_eq!(Setting::<String>::fields()[0].name, "value");

    let setting = Setting { value: 7_u8 };
    assert_eq!(format!("{setting:?}"), "Setting { value: 7 }");
}
