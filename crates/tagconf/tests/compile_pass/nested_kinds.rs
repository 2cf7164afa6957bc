//! Test every supported shape of a nested struct field.

use tagconf::{ConfigManager, Configure, provider::MapEnv};

#[derive(Configure, Default)]
struct Inner {
    #[config(envconfig = "INNER_NAME", default = "inner")]
    name: String,
}

#[derive(Configure, Default)]
struct Outer {
    #[config(nested)]
    plain: Inner,

    #[config(nested)]
    boxed: Box<Inner>,

    #[config(nested)]
    optional: Option<Inner>,

    #[config(nested)]
    optional_boxed: Option<Box<Inner>>,

    #[config(nested)]
    list: Vec<Inner>,

    #[config(nested)]
    boxed_list: Vec<Box<Inner>>,

    #[config(nested, ignored)]
    skipped: Option<Inner>,
}

fn main() {
    let mut outer = Outer {
        list: vec![Inner::default()],
        ..Outer::default()
    };

    ConfigManager::new()
        .prepare_to(&mut outer)
        .with_env(MapEnv::new())
        .run()
        .unwrap();

    assert_eq!(outer.plain.name, "inner");
    assert_eq!(outer.boxed.name, "inner");
    assert_eq!(outer.optional.unwrap().name, "inner");
    assert_eq!(outer.optional_boxed.unwrap().name, "inner");
    assert_eq!(outer.list[0].name, "inner");
    assert!(outer.boxed_list.is_empty());
    assert!(outer.skipped.is_none());
}
