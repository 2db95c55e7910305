//! Platform-level identity of a source document.
//!
//! A document's behavior under rule selection depends on where it lives in a
//! configuration export tree: its file type (`.bsl` vs `.os`), its module
//! type, the platform compatibility mode of the workspace, and the vendor
//! support variant. All of that is derived or injected here; nothing in this
//! module reads the syntax tree.

use std::fmt;

use smol_str::SmolStr;

/// Source dialect, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// A 1C:Enterprise configuration module (`.bsl`).
    Bsl,
    /// A standalone OneScript file (`.os`).
    Os,
}

impl FileType {
    pub fn from_path(path: &str) -> Self {
        let lower = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        if lower == "os" { Self::Os } else { Self::Bsl }
    }
}

/// Kind of module within a configuration.
///
/// Rules may restrict themselves to a subset of module types; `.os` files
/// have no module type and are always `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleType {
    CommandModule,
    CommonModule,
    ExternalConnectionModule,
    FormModule,
    ManagedApplicationModule,
    ManagerModule,
    ObjectModule,
    OrdinaryApplicationModule,
    RecordSetModule,
    SessionModule,
    ValueManagerModule,
    Unknown,
}

/// What a configuration export path tells us about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentity {
    pub module_type: ModuleType,
    /// Metadata-object reference, e.g. `CommonModule.Users`; `None` when the
    /// path does not follow export conventions.
    pub mdo_ref: Option<SmolStr>,
}

impl ModuleIdentity {
    pub fn unknown() -> Self {
        Self {
            module_type: ModuleType::Unknown,
            mdo_ref: None,
        }
    }
}

/// Collection directory names of a Designer export, paired with the singular
/// metadata kind used in mdo refs.
const MDO_COLLECTIONS: &[(&str, &str)] = &[
    ("AccumulationRegisters", "AccumulationRegister"),
    ("BusinessProcesses", "BusinessProcess"),
    ("Catalogs", "Catalog"),
    ("ChartsOfAccounts", "ChartOfAccounts"),
    ("ChartsOfCharacteristicTypes", "ChartOfCharacteristicTypes"),
    ("CommonModules", "CommonModule"),
    ("Constants", "Constant"),
    ("DataProcessors", "DataProcessor"),
    ("Documents", "Document"),
    ("Enums", "Enum"),
    ("ExchangePlans", "ExchangePlan"),
    ("InformationRegisters", "InformationRegister"),
    ("Reports", "Report"),
    ("Tasks", "Task"),
];

fn mdo_kind(collection_dir: &str) -> Option<&'static str> {
    MDO_COLLECTIONS
        .iter()
        .find(|(dir, _)| *dir == collection_dir)
        .map(|(_, kind)| *kind)
}

/// Derive module type and mdo ref from a configuration export path.
///
/// Recognized layouts (`<K>` a collection directory such as `Catalogs`):
/// - `CommonModules/<Name>/Ext/Module.bsl`
/// - `<K>/<Name>/Ext/{Manager,Object,RecordSet,ValueManager}Module.bsl`
/// - `<K>/<Name>/Forms/<Form>/Ext/Form/Module.bsl`
/// - `<K>/<Name>/Commands/<Command>/Ext/CommandModule.bsl`
/// - `Ext/{ManagedApplication,OrdinaryApplication,Session,ExternalConnection}Module.bsl`
///
/// Anything else, including every `.os` file, is `Unknown` with no mdo ref.
pub fn identify(path: &str) -> ModuleIdentity {
    if FileType::from_path(path) == FileType::Os {
        return ModuleIdentity::unknown();
    }

    let normalized = path.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    let Some((&file_name, dirs)) = segments.split_last() else {
        return ModuleIdentity::unknown();
    };

    match file_name {
        "Module.bsl" => identify_generic_module(dirs),
        "ManagerModule.bsl" => identify_object_scoped(dirs, ModuleType::ManagerModule),
        "ObjectModule.bsl" => identify_object_scoped(dirs, ModuleType::ObjectModule),
        "RecordSetModule.bsl" => identify_object_scoped(dirs, ModuleType::RecordSetModule),
        "ValueManagerModule.bsl" => identify_object_scoped(dirs, ModuleType::ValueManagerModule),
        "CommandModule.bsl" => identify_command_module(dirs),
        "ManagedApplicationModule.bsl" => configuration_module(dirs, ModuleType::ManagedApplicationModule),
        "OrdinaryApplicationModule.bsl" => {
            configuration_module(dirs, ModuleType::OrdinaryApplicationModule)
        }
        "SessionModule.bsl" => configuration_module(dirs, ModuleType::SessionModule),
        "ExternalConnectionModule.bsl" => {
            configuration_module(dirs, ModuleType::ExternalConnectionModule)
        }
        _ => ModuleIdentity::unknown(),
    }
}

/// `Module.bsl` names both common modules and form modules; the surrounding
/// directories disambiguate.
fn identify_generic_module(dirs: &[&str]) -> ModuleIdentity {
    // CommonModules/<Name>/Ext/Module.bsl
    if let [.., collection, name, ext] = dirs {
        if *collection == "CommonModules" && *ext == "Ext" {
            return ModuleIdentity {
                module_type: ModuleType::CommonModule,
                mdo_ref: Some(SmolStr::new(format!("CommonModule.{name}"))),
            };
        }
    }
    // <K>/<Name>/Forms/<Form>/Ext/Form/Module.bsl
    if let [.., collection, name, forms, form, ext, form_dir] = dirs {
        if *forms == "Forms" && *ext == "Ext" && *form_dir == "Form" {
            if let Some(kind) = mdo_kind(collection) {
                return ModuleIdentity {
                    module_type: ModuleType::FormModule,
                    mdo_ref: Some(SmolStr::new(format!("{kind}.{name}.Form.{form}"))),
                };
            }
        }
    }
    ModuleIdentity::unknown()
}

/// `<K>/<Name>/Ext/<file>` modules owned by a single metadata object.
fn identify_object_scoped(dirs: &[&str], module_type: ModuleType) -> ModuleIdentity {
    if let [.., collection, name, ext] = dirs {
        if *ext == "Ext" {
            if let Some(kind) = mdo_kind(collection) {
                return ModuleIdentity {
                    module_type,
                    mdo_ref: Some(SmolStr::new(format!("{kind}.{name}"))),
                };
            }
        }
    }
    ModuleIdentity::unknown()
}

/// `<K>/<Name>/Commands/<Command>/Ext/CommandModule.bsl`
fn identify_command_module(dirs: &[&str]) -> ModuleIdentity {
    if let [.., collection, name, commands, command, ext] = dirs {
        if *commands == "Commands" && *ext == "Ext" {
            if let Some(kind) = mdo_kind(collection) {
                return ModuleIdentity {
                    module_type: ModuleType::CommandModule,
                    mdo_ref: Some(SmolStr::new(format!("{kind}.{name}.Command.{command}"))),
                };
            }
        }
    }
    ModuleIdentity::unknown()
}

/// Configuration-root modules live directly under `Ext/`.
fn configuration_module(dirs: &[&str], module_type: ModuleType) -> ModuleIdentity {
    if let [.., ext] = dirs {
        if *ext == "Ext" {
            return ModuleIdentity {
                module_type,
                mdo_ref: Some(SmolStr::new_static("Configuration")),
            };
        }
    }
    ModuleIdentity::unknown()
}

/// Platform compatibility mode of a workspace, `8.<minor>.<version>`.
///
/// Totally ordered so a rule's minimum can be compared against the
/// workspace's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompatibilityMode {
    pub minor: u16,
    pub version: u16,
}

impl CompatibilityMode {
    pub const fn new(minor: u16, version: u16) -> Self {
        Self { minor, version }
    }
}

impl Default for CompatibilityMode {
    /// The behavior of a workspace that never declared a mode.
    fn default() -> Self {
        Self::new(3, 10)
    }
}

impl fmt::Display for CompatibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "8.{}.{}", self.minor, self.version)
    }
}

/// Vendor support state of a document, most restrictive first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SupportVariant {
    NotEditable,
    EditableSupportEnabled,
    NotSupported,
    #[default]
    None,
}

/// The per-document facts rule selection consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentMeta {
    pub file_type: FileType,
    pub module_type: ModuleType,
    pub compatibility: CompatibilityMode,
    pub support: SupportVariant,
}

impl DocumentMeta {
    pub fn new(file_type: FileType, module_type: ModuleType) -> Self {
        Self {
            file_type,
            module_type,
            compatibility: CompatibilityMode::default(),
            support: SupportVariant::None,
        }
    }
}
