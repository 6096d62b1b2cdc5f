use super::*;
use tempfile::TempDir;

#[test]
fn test_memory_registry_register_is_idempotent() {
    let mut registry = MemoryRegistry::new();
    registry.register_plugin("picgo-plugin-a");
    registry.register_plugin("picgo-plugin-b");
    registry.register_plugin("picgo-plugin-a");

    assert_eq!(registry.names(), ["picgo-plugin-a", "picgo-plugin-b"]);
    assert!(registry.has_plugin("picgo-plugin-b"));
}

#[test]
fn test_memory_registry_unregister() {
    let mut registry = MemoryRegistry::with_plugins(["picgo-plugin-a", "picgo-plugin-b"]);
    registry.unregister_plugin("picgo-plugin-a");
    registry.unregister_plugin("picgo-plugin-missing");

    assert_eq!(registry.names(), ["picgo-plugin-b"]);
    assert!(!registry.has_plugin("picgo-plugin-a"));
}

#[test]
fn test_config_registry_persists_on_save() {
    let temp = TempDir::new().unwrap();
    let base = BaseDir::new(temp.path());

    let mut registry = ConfigRegistry::load(base.clone()).unwrap();
    registry.register_plugin("picgo-plugin-foo");
    registry.register_plugin("@scope/picgo-plugin-bar");
    registry.save().unwrap();

    let reloaded = ConfigRegistry::load(base).unwrap();
    assert!(reloaded.has_plugin("picgo-plugin-foo"));
    assert!(reloaded.has_plugin("@scope/picgo-plugin-bar"));
    let names: Vec<&str> = reloaded.plugins().map(|(name, _)| name).collect();
    assert_eq!(names, ["@scope/picgo-plugin-bar", "picgo-plugin-foo"]);
}

#[test]
fn test_config_registry_unchanged_does_not_write() {
    let temp = TempDir::new().unwrap();
    let base = BaseDir::new(temp.path());

    let mut registry = ConfigRegistry::load(base.clone()).unwrap();
    registry.unregister_plugin("picgo-plugin-missing");
    registry.save().unwrap();

    assert!(!base.config_path().exists());
}

#[test]
fn test_config_registry_unregister_keeps_other_settings() {
    let temp = TempDir::new().unwrap();
    let base = BaseDir::new(temp.path());
    std::fs::write(
        base.config_path(),
        r#"{"registry":"https://r.example","picgoPlugins":{"picgo-plugin-foo":true,"picgo-plugin-bar":false}}"#,
    )
    .unwrap();

    let mut registry = ConfigRegistry::load(base.clone()).unwrap();
    assert!(registry.has_plugin("picgo-plugin-bar"));
    registry.unregister_plugin("picgo-plugin-foo");
    registry.save().unwrap();

    let config = base.load_config().unwrap();
    assert_eq!(config.registry.as_deref(), Some("https://r.example"));
    assert!(!config.picgo_plugins.contains_key("picgo-plugin-foo"));
    assert_eq!(config.picgo_plugins.get("picgo-plugin-bar"), Some(&false));
}
