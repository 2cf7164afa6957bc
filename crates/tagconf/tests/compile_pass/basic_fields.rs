//! Test that the common field options compile and populate the struct.

use tagconf::{ConfigManager, Configure, provider::MapEnv};

#[derive(Configure, Default)]
struct Config {
    /// The database driver
    #[config(envconfig = "DATABASE_DRIVER", required)]
    driver: String,

    #[config(env = "DATABASE_PORT", default = "5432")]
    port: u16,

    #[config(envconfig = "DATABASE_PASSWORD", secret_name = "db/password", secret)]
    password: String,

    #[config(envconfig = "UNUSED", ignored)]
    ignored: String,

    derived: String,
}

fn main() {
    let mut config = Config::default();
    ConfigManager::new()
        .prepare_to(&mut config)
        .with_env(MapEnv::new().with("DATABASE_DRIVER", "postgresql"))
        .with_secrets(tagconf::provider::StaticSecrets::new().with("db/password", "pw"))
        .run()
        .unwrap();

    assert_eq!(config.driver, "postgresql");
    assert_eq!(config.port, 5432);
    assert_eq!(config.password, "pw");
    assert!(config.ignored.is_empty());
    assert!(config.derived.is_empty());
    assert_eq!(Config::fields().len(), 4);
}
