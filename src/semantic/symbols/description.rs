//! Method description parsing
//!
//! A method's description is the contiguous `//` comment block directly above
//! its declaration. The block follows a loose convention:
//!
//! ```text
//! // Краткое описание метода.
//! //
//! // Параметры:
//! //  Имя - Строка - что передать
//! //
//! // Возвращаемое значение:
//! //  Булево - признак успеха
//! ```
//!
//! Everything is optional. The parser never fails; unrecognized lines join
//! the purpose text.

use smol_str::SmolStr;

/// Parsed description of a method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDescription {
    /// Free text before the first section marker
    pub purpose: String,
    /// Set when the description starts with `Устарела.` / `Deprecated.`
    pub deprecated: bool,
    /// Text after the deprecation marker, usually the replacement to use
    pub deprecation_info: String,
    pub parameters: Vec<ParameterDescription>,
    /// Type names listed in the returns section, in written order
    pub return_types: Vec<SmolStr>,
}

/// One entry of the parameters section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterDescription {
    pub name: SmolStr,
    pub types: Vec<SmolStr>,
    pub text: String,
}

impl MethodDescription {
    pub fn is_empty(&self) -> bool {
        self.purpose.is_empty()
            && !self.deprecated
            && self.parameters.is_empty()
            && self.return_types.is_empty()
    }
}

#[derive(PartialEq)]
enum Section {
    Purpose,
    Parameters,
    Returns,
}

fn is_parameters_marker(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    lower == "параметры:" || lower == "parameters:"
}

fn is_returns_marker(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    lower == "возвращаемое значение:" || lower == "returns:" || lower == "return value:"
}

fn deprecation_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    for marker in ["Устарела.", "Устарел.", "Deprecated."] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    None
}

/// Parse a doc-comment block (already stripped of `//`) into a description
pub fn parse_description(text: &str) -> MethodDescription {
    let mut description = MethodDescription::default();
    let mut section = Section::Purpose;
    let mut purpose_lines: Vec<&str> = Vec::new();
    let mut first_content_line = true;

    for line in text.lines() {
        if is_parameters_marker(line) {
            section = Section::Parameters;
            continue;
        }
        if is_returns_marker(line) {
            section = Section::Returns;
            continue;
        }

        match section {
            Section::Purpose => {
                if first_content_line && !line.trim().is_empty() {
                    first_content_line = false;
                    if let Some(info) = deprecation_marker(line) {
                        description.deprecated = true;
                        description.deprecation_info = info.to_string();
                        continue;
                    }
                }
                purpose_lines.push(line);
            }
            Section::Parameters => parse_parameter_line(line, &mut description.parameters),
            Section::Returns => {
                // The first content line carries the type list
                if description.return_types.is_empty() && !line.trim().is_empty() {
                    description.return_types = split_types(type_part(line));
                }
            }
        }
    }

    description.purpose = purpose_lines.join("\n").trim().to_string();
    description
}

/// Parameter lines look like `Имя - Тип1, Тип2 - пояснение`. A line that
/// does not start a new parameter continues the previous one's text.
fn parse_parameter_line(line: &str, parameters: &mut Vec<ParameterDescription>) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return;
    }

    let mut parts = trimmed.splitn(3, " - ");
    let head = parts.next().unwrap_or("").trim();

    if is_identifier(head) {
        let types = parts.next().map(split_types).unwrap_or_default();
        let text = parts.next().unwrap_or("").trim().to_string();
        parameters.push(ParameterDescription {
            name: SmolStr::new(head),
            types,
            text,
        });
    } else if let Some(last) = parameters.last_mut() {
        if !last.text.is_empty() {
            last.text.push('\n');
        }
        last.text.push_str(trimmed);
    }
}

/// The type list is everything before the first ` - ` separator
fn type_part(line: &str) -> &str {
    line.trim().split(" - ").next().unwrap_or("").trim()
}

fn split_types(list: &str) -> Vec<SmolStr> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SmolStr::new)
        .collect()
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(crate::core::text_utils::is_word_character)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_purpose_only() {
        let description = parse_description("Пересчитывает остатки по складу.");
        assert_eq!(description.purpose, "Пересчитывает остатки по складу.");
        assert!(!description.deprecated);
        assert!(description.parameters.is_empty());
        assert!(description.return_types.is_empty());
    }

    #[test]
    fn test_parse_full_description() {
        let text = "Складывает два числа.\n\
                    \n\
                    Параметры:\n\
                    \u{20}Первое - Число - первое слагаемое\n\
                    \u{20}Второе - Число, Строка - второе слагаемое\n\
                    \n\
                    Возвращаемое значение:\n\
                    \u{20}Число - сумма";
        let description = parse_description(text);

        assert_eq!(description.purpose, "Складывает два числа.");
        assert_eq!(description.parameters.len(), 2);
        assert_eq!(description.parameters[0].name, "Первое");
        assert_eq!(description.parameters[0].types, vec![SmolStr::new("Число")]);
        assert_eq!(
            description.parameters[1].types,
            vec![SmolStr::new("Число"), SmolStr::new("Строка")]
        );
        assert_eq!(description.return_types, vec![SmolStr::new("Число")]);
    }

    #[test]
    fn test_parse_deprecation() {
        let description =
            parse_description("Устарела. Используйте СложитьНовая.\nСкладывает два числа.");
        assert!(description.deprecated);
        assert_eq!(description.deprecation_info, "Используйте СложитьНовая.");
        assert_eq!(description.purpose, "Складывает два числа.");
    }

    #[test]
    fn test_parse_english_markers() {
        let text = "Adds two numbers.\n\
                    Parameters:\n\
                    \u{20}First - Number - the first addend\n\
                    Returns:\n\
                    \u{20}Number - the sum";
        let description = parse_description(text);
        assert_eq!(description.parameters.len(), 1);
        assert_eq!(description.return_types, vec![SmolStr::new("Number")]);
    }

    #[test]
    fn test_parameter_text_continuation() {
        let text = "Параметры:\n\
                    \u{20}Настройки - Структура - описание начинается\n\
                    \u{20}  и продолжается на следующей строке";
        let description = parse_description(text);
        assert_eq!(description.parameters.len(), 1);
        assert!(description.parameters[0]
            .text
            .contains("продолжается на следующей строке"));
    }

    #[test]
    fn test_returns_without_dash() {
        let text = "Возвращаемое значение:\n\u{20}Булево";
        let description = parse_description(text);
        assert_eq!(description.return_types, vec![SmolStr::new("Булево")]);
    }

    #[test]
    fn test_empty_description() {
        assert!(parse_description("").is_empty());
    }
}
