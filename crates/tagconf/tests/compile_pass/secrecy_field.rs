//! Test that secrecy types can be fields and keep their own redaction.

use tagconf::{ConfigManager, Configure, ExposeSecret, SecretString, provider::StaticSecrets};

#[derive(Configure)]
struct Credentials {
    #[config(envconfig = "API_KEY", secret)]
    api_key: SecretString,
}

fn main() {
    let mut creds = Credentials {
        api_key: SecretString::from(String::new()),
    };
    ConfigManager::new()
        .prepare_to(&mut creds)
        .with_env(tagconf::provider::MapEnv::new())
        .with_secrets(StaticSecrets::new().with("API_KEY", "sk-123"))
        .run()
        .unwrap();

    assert_eq!(creds.api_key.expose_secret(), "sk-123");
    assert!(!format!("{creds:?}").contains("sk-123"));
}
