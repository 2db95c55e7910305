//! The analysis pipeline through workspace configuration.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bsl_sema::diagnostics::{DiagnosticsOptions, Mode, RuleId, RuleSettings, SkipSupport};
use bsl_sema::platform::SupportVariant;
use bsl_sema::WorkspaceEvent;

use crate::helpers::fixtures::NOISY_MODULE;
use crate::helpers::workspace_helpers::single_module;

fn only(rule: &str) -> DiagnosticsOptions {
    let mut options = DiagnosticsOptions {
        mode: Mode::Only,
        ..DiagnosticsOptions::default()
    };
    options
        .rules
        .insert(RuleId::new(rule), RuleSettings::Enabled(true));
    options
}

#[test]
fn test_defaults_report_activated_rules() {
    let (workspace, file) = single_module(NOISY_MODULE);
    let document = workspace.get_document(&file).unwrap();

    let diagnostics = document.diagnostics();
    let codes: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();

    assert_eq!(codes, vec!["MagicNumber"]);
    assert_eq!(diagnostics[0].range.start.line, 1);
}

#[test]
fn test_reconfiguring_narrows_the_reported_set() {
    let (workspace, file) = single_module(NOISY_MODULE);
    let document = workspace.get_document(&file).unwrap();
    assert!(!document.diagnostics().is_empty());

    workspace.configure(only("LineLength"));

    assert!(
        document.diagnostics().is_empty(),
        "no long lines, and the magic number rule is no longer selected"
    );
}

#[test]
fn test_suppression_markers_silence_a_region() {
    let (workspace, file) = single_module(
        "Процедура Обработать() Экспорт\n    // sema:off MagicNumber\n    А = 42;\n    // sema:on MagicNumber\n    Б = 42;\nКонецПроцедуры",
    );
    let document = workspace.get_document(&file).unwrap();

    let diagnostics = document.diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range.start.line, 4);
}

#[test]
fn test_locked_support_silences_documents_when_configured() {
    let (workspace, file) = single_module(NOISY_MODULE);
    let document = workspace.get_document(&file).unwrap();

    workspace.set_support_variant(&file, SupportVariant::NotEditable);
    workspace.configure(DiagnosticsOptions {
        skip_support: SkipSupport::WithSupportLocked,
        ..DiagnosticsOptions::default()
    });
    assert!(document.diagnostics().is_empty());

    // Withdrawn support is not locked support
    workspace.set_support_variant(&file, SupportVariant::NotSupported);
    assert!(!document.diagnostics().is_empty());
}

#[test]
fn test_configuration_changes_raise_an_event() {
    let (workspace, _) = single_module("Перем А;");
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    workspace.subscribe(move |event, _| {
        if matches!(event, WorkspaceEvent::ConfigurationChanged) {
            sink.fetch_add(1, Ordering::SeqCst);
        }
    });

    workspace.configure(DiagnosticsOptions::default());

    assert_eq!(count.load(Ordering::SeqCst), 1);
}
