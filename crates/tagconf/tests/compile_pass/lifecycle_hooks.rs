//! Test that the struct-level hook declarations wire up the traits.

use tagconf::{BoxError, ConfigManager, Configure, Dependencies, InitWith, Prepare, PrepareWith};

#[derive(Configure, Default)]
#[configure(prepare_with, init_with)]
struct Service {
    #[config(envconfig = "SERVICE_NAME", default = "svc")]
    name: String,

    label: String,
    initialized: bool,
}

impl InitWith for Service {
    fn init_with(&mut self, _deps: &Dependencies) -> Result<(), BoxError> {
        self.initialized = true;
        Ok(())
    }
}

impl PrepareWith for Service {
    fn prepare_with(&mut self, deps: &Dependencies) -> Result<(), BoxError> {
        if let Some(suffix) = deps.get::<&'static str>() {
            self.name.push_str(suffix);
        }
        Ok(())
    }
}

impl Prepare for Service {
    fn prepare(&mut self) -> Result<(), BoxError> {
        self.label = self.name.to_uppercase();
        Ok(())
    }
}

#[derive(Configure, Default)]
#[configure(prepare)]
struct Single {
    value: u8,
}

impl Prepare for Single {
    fn prepare(&mut self) -> Result<(), BoxError> {
        self.value = 1;
        Ok(())
    }
}

fn main() {
    let mut service = Service::default();
    ConfigManager::new()
        .prepare_to(&mut service)
        .with_env(tagconf::provider::MapEnv::new())
        .with("-1")
        .run()
        .unwrap();

    assert!(service.initialized);
    assert_eq!(service.label, "SVC-1");

    let mut single = Single::default();
    tagconf::ConfigTarget::new(&mut single).prepare().unwrap();
    assert_eq!(single.value, 1);
}
