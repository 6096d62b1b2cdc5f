use super::*;
use crate::mock::RecordingLogger;
use proptest::prelude::*;

/// npm パッケージ名として有効な部分文字列
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,15}".prop_map(|s| s)
}

/// バージョン・タグ
fn version_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        "(latest|beta|next)",
    ]
}

fn resolver() -> NameResolver {
    // 存在しないディレクトリを基準にして、パス扱いにならないようにする
    NameResolver::new("/nonexistent-ppm-proptest-cwd")
}

proptest! {
    /// 正規名を解決すると同じパッケージ名になる
    #[test]
    fn prop_canonical_name_is_fixed_point(name in name_strategy()) {
        let canonical = format!("{}{}", PLUGIN_PREFIX, name);
        let resolved = resolver().resolve(&canonical, &RecordingLogger::new());
        prop_assert!(resolved.success);
        prop_assert_eq!(&resolved.package_name, &canonical);
        prop_assert_eq!(&resolved.full_specifier, &canonical);
    }

    /// スコープ付き正規名も同様
    #[test]
    fn prop_scoped_canonical_name_is_fixed_point(scope in name_strategy(), name in name_strategy()) {
        let canonical = format!("@{}/{}{}", scope, PLUGIN_PREFIX, name);
        let resolved = resolver().resolve(&canonical, &RecordingLogger::new());
        prop_assert!(resolved.success);
        prop_assert_eq!(&resolved.package_name, &canonical);
    }

    /// 解決後のパッケージ名を再解決しても変わらない
    #[test]
    fn prop_resolution_is_idempotent(name in name_strategy(), version in proptest::option::of(version_strategy())) {
        let raw = match &version {
            Some(v) => format!("{}@{}", name, v),
            None => name.clone(),
        };
        let first = resolver().resolve(&raw, &RecordingLogger::new());
        prop_assert!(first.success);

        let second = resolver().resolve(&first.package_name, &RecordingLogger::new());
        prop_assert_eq!(&second.package_name, &first.package_name);
        prop_assert!(is_canonical_name(&first.package_name));
    }

    /// 短縮形と接頭辞付きは同じパッケージ名になる
    #[test]
    fn prop_short_and_full_names_agree(name in name_strategy()) {
        let short = resolver().resolve(&name, &RecordingLogger::new());
        let full = resolver().resolve(&format!("{}{}", PLUGIN_PREFIX, name), &RecordingLogger::new());
        prop_assert_eq!(short.package_name, full.package_name);
    }

    /// バージョン指定は指定子にだけ残る
    #[test]
    fn prop_version_kept_in_specifier_only(name in name_strategy(), version in version_strategy()) {
        let resolved = resolver().resolve(&format!("{}@{}", name, version), &RecordingLogger::new());
        let expected_specifier = format!("{}{}@{}", PLUGIN_PREFIX, name, version);
        prop_assert_eq!(&resolved.full_specifier, &expected_specifier);
        prop_assert!(!resolved.package_name.contains('@'));
    }
}
