//! Test that every built-in coercion target can be a field.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use tagconf::Configure;

#[derive(Configure, Default)]
struct Types {
    #[config(envconfig = "T_STRING")]
    string: String,
    #[config(envconfig = "T_PATH")]
    path: PathBuf,
    #[config(envconfig = "T_BOOL")]
    flag: bool,
    #[config(envconfig = "T_I8")]
    i8_value: i8,
    #[config(envconfig = "T_I64")]
    i64_value: i64,
    #[config(envconfig = "T_ISIZE")]
    isize_value: isize,
    #[config(envconfig = "T_U8")]
    u8_value: u8,
    #[config(envconfig = "T_U64")]
    u64_value: u64,
    #[config(envconfig = "T_USIZE")]
    usize_value: usize,
    #[config(envconfig = "T_F32")]
    f32_value: f32,
    #[config(envconfig = "T_F64")]
    f64_value: f64,
    #[config(envconfig = "T_DURATION")]
    duration: Duration,
    #[config(envconfig = "T_DELTA")]
    delta: chrono::TimeDelta,
    #[config(envconfig = "T_BYTES")]
    bytes: Vec<u8>,
    #[config(envconfig = "T_LIST")]
    list: Vec<String>,
    #[config(envconfig = "T_MAP")]
    map: HashMap<String, u16>,
    #[config(envconfig = "T_BTREE")]
    btree: BTreeMap<String, bool>,
    #[config(envconfig = "T_OPTION")]
    option: Option<u32>,
    #[config(envconfig = "T_BOX")]
    boxed: Box<i16>,
}

fn main() {
    assert_eq!(Types::fields().len(), 19);
}
