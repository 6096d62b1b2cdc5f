use super::*;
use crate::event::NotificationBody;
use crate::mock::RecordingLogger;
use crate::registry::MemoryRegistry;

fn batch(operation: Operation, names: &[&str], already: &[&str]) -> OperationBatch {
    OperationBatch {
        operation,
        specifiers: names.iter().map(|s| s.to_string()).collect(),
        package_names: names.iter().map(|s| s.to_string()).collect(),
        already_installed: already.iter().map(|s| s.to_string()).collect(),
    }
}

fn exit(code: i32, output: &str) -> ProcessResult {
    ProcessResult {
        exit_code: code,
        output: output.to_string(),
    }
}

#[test]
fn test_empty_batch_without_installed_fails() {
    for operation in [Operation::Install, Operation::Uninstall, Operation::Update] {
        let mut registry = MemoryRegistry::new();
        let logger = RecordingLogger::new();

        let outcome = reconcile(&batch(operation, &[], &[]), None, &mut registry, &logger);

        assert!(!outcome.is_success());
        assert_eq!(outcome.operation(), operation);
        let message = outcome.notification().body.as_message().unwrap();
        assert!(message.contains(NO_VALID_PLUGIN));
        assert_eq!(logger.count("error"), 1);
        assert!(registry.names().is_empty());
    }
}

#[test]
fn test_empty_batch_with_installed_succeeds() {
    let mut registry = MemoryRegistry::with_plugins(["picgo-plugin-foo"]);
    let logger = RecordingLogger::new();

    let outcome = reconcile(
        &batch(Operation::Install, &[], &["picgo-plugin-foo"]),
        None,
        &mut registry,
        &logger,
    );

    assert!(matches!(outcome, Outcome::InstallSuccess(_)));
    assert_eq!(
        outcome.notification().body,
        NotificationBody::List(vec!["picgo-plugin-foo".to_string()])
    );
    assert_eq!(registry.names(), ["picgo-plugin-foo"]);
}

#[test]
fn test_install_success_registers_and_lists_all() {
    let mut registry = MemoryRegistry::with_plugins(["picgo-plugin-old"]);
    let logger = RecordingLogger::new();

    let outcome = reconcile(
        &batch(
            Operation::Install,
            &["picgo-plugin-a", "picgo-plugin-b"],
            &["picgo-plugin-old"],
        ),
        Some(&exit(0, "added 2 packages")),
        &mut registry,
        &logger,
    );

    assert!(matches!(outcome, Outcome::InstallSuccess(_)));
    assert_eq!(
        outcome.notification().body.as_list().unwrap(),
        ["picgo-plugin-a", "picgo-plugin-b", "picgo-plugin-old"]
    );
    assert_eq!(
        registry.names(),
        ["picgo-plugin-old", "picgo-plugin-a", "picgo-plugin-b"]
    );
    assert_eq!(logger.count("success"), 1);
}

#[test]
fn test_uninstall_success_unregisters() {
    let mut registry = MemoryRegistry::with_plugins(["picgo-plugin-a", "picgo-plugin-b"]);

    let outcome = reconcile(
        &batch(Operation::Uninstall, &["picgo-plugin-a"], &[]),
        Some(&exit(0, "")),
        &mut registry,
        &RecordingLogger::new(),
    );

    assert!(matches!(outcome, Outcome::UninstallSuccess(_)));
    assert_eq!(outcome.notification().body.as_list().unwrap(), ["picgo-plugin-a"]);
    assert_eq!(registry.names(), ["picgo-plugin-b"]);
}

#[test]
fn test_update_success_leaves_registry_untouched() {
    let mut registry = MemoryRegistry::with_plugins(["picgo-plugin-a"]);

    let outcome = reconcile(
        &batch(Operation::Update, &["picgo-plugin-a", "picgo-plugin-z"], &[]),
        Some(&exit(0, "")),
        &mut registry,
        &RecordingLogger::new(),
    );

    assert!(matches!(outcome, Outcome::UpdateSuccess(_)));
    assert_eq!(
        outcome.notification().body.as_list().unwrap(),
        ["picgo-plugin-a", "picgo-plugin-z"]
    );
    assert_eq!(registry.names(), ["picgo-plugin-a"]);
}

#[test]
fn test_nonzero_exit_fails_without_mutation() {
    for operation in [Operation::Install, Operation::Uninstall, Operation::Update] {
        let mut registry = MemoryRegistry::with_plugins(["picgo-plugin-foo"]);
        let logger = RecordingLogger::new();

        let outcome = reconcile(
            &batch(operation, &["picgo-plugin-foo", "picgo-plugin-bar"], &[]),
            Some(&exit(1, "npm ERR! code ENOENT")),
            &mut registry,
            &logger,
        );

        assert!(!outcome.is_success());
        let message = outcome.notification().body.as_message().unwrap();
        assert!(message.contains("exit code 1"));
        assert!(message.contains("npm ERR! code ENOENT"));
        assert_eq!(registry.names(), ["picgo-plugin-foo"]);
        assert_eq!(logger.count("error"), 1);
    }
}

#[test]
fn test_signal_exit_code_is_failure() {
    let mut registry = MemoryRegistry::new();
    let outcome = reconcile(
        &batch(Operation::Install, &["picgo-plugin-foo"], &[]),
        Some(&exit(crate::executor::UNKNOWN_EXIT_CODE, "")),
        &mut registry,
        &RecordingLogger::new(),
    );
    assert!(matches!(outcome, Outcome::InstallFailed(_)));
    assert!(registry.names().is_empty());
}
