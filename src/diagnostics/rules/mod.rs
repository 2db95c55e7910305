//! Shipped diagnostic rules
//!
//! Each rule is registered with full metadata; selection decides per document
//! which of them run. Registration order is the canonical rule order.

mod cognitive_complexity;
mod deprecated_find;
mod export_method_description;
mod line_length;
mod magic_number;
mod unused_local_method;

pub use cognitive_complexity::CognitiveComplexity;
pub use deprecated_find::DeprecatedFind;
pub use export_method_description::ExportMethodDescription;
pub use line_length::LineLength;
pub use magic_number::MagicNumber;
pub use unused_local_method::UnusedLocalMethod;

use crate::diagnostics::registry::RuleRegistry;

pub(crate) fn register_builtin(registry: &mut RuleRegistry) {
    registry.register(Box::new(LineLength::new()));
    registry.register(Box::new(MagicNumber::new()));
    registry.register(Box::new(CognitiveComplexity::new()));
    registry.register(Box::new(UnusedLocalMethod::new()));
    registry.register(Box::new(ExportMethodDescription::new()));
    registry.register(Box::new(DeprecatedFind::new()));
}
