#![no_main]

use libfuzzer_sys::fuzz_target;
use serde::Deserialize;
use tagconf::provider::StaticSecrets;
use tagconf::{Configure, JsonConfigManager};

#[derive(Configure, Deserialize, Default)]
#[serde(default)]
struct Inner {
    #[config(secret)]
    token: String,

    port: u16,
}

#[derive(Configure, Deserialize, Default)]
#[serde(default)]
struct Document {
    #[config(secret)]
    password: String,

    name: String,

    #[config(nested)]
    items: Vec<Inner>,

    #[config(nested)]
    extra: Option<Inner>,
}

fuzz_target!(|data: &[u8]| {
    let secrets = StaticSecrets::new()
        .with("PASSWORD", "resolved")
        .with("TOKEN", "resolved-token");

    let mut doc = Document::default();
    let result = JsonConfigManager::new()
        .prepare_to(&mut doc)
        .prepare_from(data.to_vec())
        .with_secrets(secrets)
        .run();

    // No marker survives a successful load on a secret field
    if result.is_ok() {
        assert!(!doc.password.starts_with("!secret:"));
        for item in &doc.items {
            assert!(!item.token.starts_with("!secret:"));
        }
    }
});
