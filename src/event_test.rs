use super::*;

#[test]
fn test_success_variant_per_operation() {
    let names = vec!["picgo-plugin-foo".to_string()];
    assert!(matches!(
        Outcome::success(Operation::Install, names.clone()),
        Outcome::InstallSuccess(_)
    ));
    assert!(matches!(
        Outcome::success(Operation::Uninstall, names.clone()),
        Outcome::UninstallSuccess(_)
    ));
    assert!(matches!(
        Outcome::success(Operation::Update, names),
        Outcome::UpdateSuccess(_)
    ));
}

#[test]
fn test_failed_variant_per_operation() {
    assert_eq!(Outcome::failed(Operation::Install, "x").name(), "installFailed");
    assert_eq!(Outcome::failed(Operation::Uninstall, "x").name(), "uninstallFailed");
    assert_eq!(Outcome::failed(Operation::Update, "x").name(), "updateFailed");
}

#[test]
fn test_outcome_accessors() {
    let outcome = Outcome::success(Operation::Update, vec!["picgo-plugin-a".to_string()]);
    assert!(outcome.is_success());
    assert_eq!(outcome.operation(), Operation::Update);
    assert_eq!(outcome.notification().title, "Update succeeded");
    assert_eq!(
        outcome.notification().body.as_list(),
        Some(&["picgo-plugin-a".to_string()][..])
    );

    let failed = Outcome::failed(Operation::Uninstall, "boom");
    assert!(!failed.is_success());
    assert_eq!(failed.notification().body.as_message(), Some("boom"));
}

#[test]
fn test_outcome_serializes_with_event_tag() {
    let outcome = Outcome::success(Operation::Install, vec!["picgo-plugin-foo".to_string()]);
    let value = serde_json::to_value(PluginEvent::Outcome(outcome)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "event": "installSuccess",
            "title": "Install succeeded",
            "body": ["picgo-plugin-foo"]
        })
    );
}

#[test]
fn test_failed_message_serializes_as_string_body() {
    let outcome = Outcome::failed(Operation::Update, "exit code 1");
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["event"], "updateFailed");
    assert_eq!(value["body"], "exit code 1");
}

#[test]
fn test_fatal_event_serialization() {
    let value = serde_json::to_value(PluginEvent::failed("npm is not installed")).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "event": "failed", "message": "npm is not installed" })
    );
}

#[test]
fn test_operation_command_names() {
    assert_eq!(Operation::Install.command(), "install");
    assert_eq!(Operation::Uninstall.to_string(), "uninstall");
    assert_eq!(Operation::Update.label(), "Update");
}
