//! Rule selection against the built-in registry.

use bsl_sema::diagnostics::{
    DiagnosticsOptions, Mode, ParamValue, RuleId, RuleRegistry, RuleSettings, select_rules,
};
use bsl_sema::platform::{CompatibilityMode, DocumentMeta, FileType, ModuleType};
use rstest::rstest;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

fn options_with(mode: Mode, rules: &[(&str, RuleSettings)]) -> DiagnosticsOptions {
    let mut options = DiagnosticsOptions {
        mode,
        ..DiagnosticsOptions::default()
    };
    for (id, settings) in rules {
        options.rules.insert(RuleId::new(*id), settings.clone());
    }
    options
}

fn parameters(entries: &[(&str, ParamValue)]) -> RuleSettings {
    let mut values = FxHashMap::default();
    for (name, value) in entries {
        values.insert(SmolStr::new(*name), value.clone());
    }
    RuleSettings::Parameters(values)
}

fn bsl_meta() -> DocumentMeta {
    DocumentMeta::new(FileType::Bsl, ModuleType::CommonModule)
}

fn selected(options: &DiagnosticsOptions, meta: &DocumentMeta) -> Vec<String> {
    let registry = RuleRegistry::with_builtin_rules();
    select_rules(options, &registry, meta)
        .iter()
        .map(|id| id.as_str().to_string())
        .collect()
}

#[test]
fn test_selection_is_deterministic() {
    let options = options_with(Mode::All, &[]);
    let meta = bsl_meta();

    assert_eq!(selected(&options, &meta), selected(&options, &meta));
}

// LineLength is activated by default, ExportMethodDescription is not; with
// no per-rule settings the mode decides everything.
#[rstest]
#[case(Mode::Off, false, false)]
#[case(Mode::On, true, false)]
#[case(Mode::All, true, true)]
#[case(Mode::Only, false, false)]
#[case(Mode::Except, true, true)]
fn test_mode_alone_decides_the_unconfigured_rule_set(
    #[case] mode: Mode,
    #[case] line_length: bool,
    #[case] export_description: bool,
) {
    let ids = selected(&options_with(mode, &[]), &bsl_meta());

    assert_eq!(ids.contains(&"LineLength".to_string()), line_length);
    assert_eq!(
        ids.contains(&"ExportMethodDescription".to_string()),
        export_description
    );
}

#[test]
fn test_only_mode_selects_exactly_the_configured_rule() {
    let options = options_with(
        Mode::Only,
        &[(
            "LineLength",
            parameters(&[("maxLineLength", ParamValue::Int(30))]),
        )],
    );

    assert_eq!(selected(&options, &bsl_meta()), vec!["LineLength"]);
}

#[test]
fn test_except_mode_drops_only_disabled_rules() {
    let options = options_with(Mode::Except, &[("LineLength", RuleSettings::Enabled(false))]);

    let ids = selected(&options, &bsl_meta());

    assert!(!ids.contains(&"LineLength".to_string()));
    assert!(ids.contains(&"MagicNumber".to_string()));
    // Rules that are off by default still run under Except
    assert!(ids.contains(&"ExportMethodDescription".to_string()));
}

#[test]
fn test_compatibility_gate_wins_over_mode() {
    let options = options_with(Mode::All, &[]);
    let mut meta = bsl_meta();
    meta.compatibility = CompatibilityMode::new(3, 3);

    assert!(!selected(&options, &meta).contains(&"DeprecatedFind".to_string()));

    meta.compatibility = CompatibilityMode::default();
    assert!(selected(&options, &meta).contains(&"DeprecatedFind".to_string()));
}

#[test]
fn test_os_documents_skip_module_restrictions() {
    let options = options_with(Mode::All, &[]);
    let os_meta = DocumentMeta::new(FileType::Os, ModuleType::Unknown);

    let ids = selected(&options, &os_meta);

    // Module restrictions do not apply to OneScript files
    assert!(ids.contains(&"ExportMethodDescription".to_string()));
    // Scope restrictions still do
    assert!(!ids.contains(&"UnusedLocalMethod".to_string()));
}

#[test]
fn test_module_restrictions_hold_for_configuration_files() {
    let options = options_with(Mode::All, &[]);
    let form_meta = DocumentMeta::new(FileType::Bsl, ModuleType::FormModule);

    assert!(!selected(&options, &form_meta).contains(&"ExportMethodDescription".to_string()));
}
