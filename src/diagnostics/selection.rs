//! Rule selection
//!
//! Decides which rules run against a document, from three inputs only: the
//! workspace options, the registry, and the document's platform facts. The
//! function is pure; the same inputs always produce the same list, in
//! registry registration order.

use crate::diagnostics::diagnostic::RuleId;
use crate::diagnostics::metadata::RuleMetadata;
use crate::diagnostics::options::{DiagnosticsOptions, Mode, RuleSettings, SkipSupport};
use crate::diagnostics::registry::RuleRegistry;
use crate::platform::{DocumentMeta, FileType, SupportVariant};

/// All rules that should run against a document with the given facts.
pub fn select_rules(
    options: &DiagnosticsOptions,
    registry: &RuleRegistry,
    meta: &DocumentMeta,
) -> Vec<RuleId> {
    if !support_allows(options.skip_support, meta.support) {
        return Vec::new();
    }

    registry
        .iter()
        .map(|rule| rule.metadata())
        .filter(|metadata| passes_filters(metadata, meta))
        .filter(|metadata| is_enabled(options, metadata))
        .map(|metadata| metadata.id.clone())
        .collect()
}

/// The support gate applies to the document as a whole, before any per-rule
/// reasoning.
fn support_allows(skip: SkipSupport, support: SupportVariant) -> bool {
    match skip {
        SkipSupport::Never => true,
        SkipSupport::WithSupportLocked => support != SupportVariant::NotEditable,
        SkipSupport::WithSupport => {
            support != SupportVariant::NotEditable
                && support != SupportVariant::EditableSupportEnabled
        }
    }
}

/// Structural applicability of a rule to a document, independent of how the
/// workspace is configured.
fn passes_filters(metadata: &RuleMetadata, meta: &DocumentMeta) -> bool {
    if !metadata.scope.includes(meta.file_type) {
        return false;
    }
    // OneScript files have no module type, so module restrictions do not
    // apply to them.
    if meta.file_type != FileType::Os
        && !metadata.modules.is_empty()
        && !metadata.modules.contains(&meta.module_type)
    {
        return false;
    }
    match metadata.min_compatibility {
        Some(min) => min <= meta.compatibility,
        None => true,
    }
}

/// Configured enablement of a rule under the workspace mode.
fn is_enabled(options: &DiagnosticsOptions, metadata: &RuleMetadata) -> bool {
    let settings = options.rule_settings(&metadata.id);

    let activated_by_default = settings.is_none() && metadata.activated_by_default;
    let enabled_directly = matches!(settings, Some(RuleSettings::Enabled(true)));
    let disabled_directly = matches!(settings, Some(RuleSettings::Enabled(false)));
    let has_custom_configuration = matches!(settings, Some(RuleSettings::Parameters(_)));
    let has_defined_setting = enabled_directly || has_custom_configuration;

    match options.mode {
        Mode::Off => false,
        Mode::All => true,
        Mode::On => activated_by_default || has_defined_setting,
        Mode::Only => has_defined_setting,
        Mode::Except => !(has_defined_setting || disabled_directly),
    }
}
