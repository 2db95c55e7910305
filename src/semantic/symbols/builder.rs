//! Symbol tree construction from the AST
//!
//! One pass over the parsed module. Variables come from three places:
//! explicit `Перем` declarations, parameters, and implicit declaration by
//! first assignment. An assignment to a module variable is a use, not a new
//! declaration.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::{LineIndex, Range};
use crate::semantic::model::case_fold;
use crate::syntax::ast::{
    Assignment, AstNode, ForEachStatement, ForStatement, Method, NameRef, SourceFile, VarDecl,
};
use crate::syntax::{SyntaxKind, SyntaxToken};

use super::description::parse_description;
use super::tree::{
    MethodKind, MethodSymbol, ParameterSymbol, SymbolTree, VariableKind, VariableSymbol,
};

/// Build the symbol tree of one document
pub fn build_symbol_tree(file: &SourceFile, text: &str, index: &LineIndex) -> SymbolTree {
    let mut tree = SymbolTree::default();

    for decl in file.var_decls() {
        let description = decl.doc_comment();
        for name in decl.names() {
            tree.module_variables.push(VariableSymbol {
                name: SmolStr::new(name.text()),
                kind: VariableKind::ModuleVariable,
                is_export: decl.is_export(),
                selection_range: token_range(&name, text, index),
                description: description.clone(),
            });
        }
    }

    let module_vars: FxHashSet<SmolStr> = tree
        .module_variables
        .iter()
        .map(|v| case_fold(&v.name))
        .collect();

    for method in file.methods() {
        if let Some(symbol) = build_method(&method, &module_vars, text, index) {
            tree.methods.push(symbol);
        }
    }

    tree
}

fn build_method(
    method: &Method,
    module_vars: &FxHashSet<SmolStr>,
    text: &str,
    index: &LineIndex,
) -> Option<MethodSymbol> {
    // A method that lost its name to a parse error has no symbol
    let name_token = method.name_token()?;

    let params: Vec<ParameterSymbol> = method
        .params()
        .filter_map(|param| {
            let token = param.name_token()?;
            Some(ParameterSymbol {
                name: SmolStr::new(token.text()),
                by_value: param.is_by_value(),
                has_default: param.default_value().is_some(),
                selection_range: token_range(&token, text, index),
            })
        })
        .collect();

    let variables = collect_method_variables(method, &params, module_vars, text, index);
    let description = method.doc_comment().map(|comment| parse_description(&comment));

    Some(MethodSymbol {
        name: SmolStr::new(name_token.text()),
        kind: if method.is_function() {
            MethodKind::Function
        } else {
            MethodKind::Procedure
        },
        is_export: method.is_export(),
        range: index.range(text, method.syntax().text_range()),
        selection_range: token_range(&name_token, text, index),
        params,
        variables,
        description,
    })
}

fn collect_method_variables(
    method: &Method,
    params: &[ParameterSymbol],
    module_vars: &FxHashSet<SmolStr>,
    text: &str,
    index: &LineIndex,
) -> Vec<VariableSymbol> {
    let mut variables = Vec::new();
    let Some(body) = method.body() else {
        return variables;
    };

    let mut seen: FxHashSet<SmolStr> = params.iter().map(|p| case_fold(&p.name)).collect();

    for node in body.syntax().descendants() {
        match node.kind() {
            SyntaxKind::VAR_DECL => {
                if let Some(decl) = VarDecl::cast(node) {
                    let description = decl.doc_comment();
                    for name in decl.names() {
                        if seen.insert(case_fold(name.text())) {
                            variables.push(VariableSymbol {
                                name: SmolStr::new(name.text()),
                                kind: VariableKind::LocalVariable,
                                is_export: false,
                                selection_range: token_range(&name, text, index),
                                description: description.clone(),
                            });
                        }
                    }
                }
            }
            SyntaxKind::ASSIGNMENT => {
                let target = Assignment::cast(node)
                    .and_then(|a| a.target())
                    .and_then(NameRef::cast)
                    .and_then(|r| r.name_token());
                if let Some(token) = target {
                    push_implicit(&token, &mut seen, module_vars, &mut variables, text, index);
                }
            }
            SyntaxKind::FOR_STATEMENT => {
                if let Some(token) = ForStatement::cast(node).and_then(|f| f.loop_variable()) {
                    push_implicit(&token, &mut seen, module_vars, &mut variables, text, index);
                }
            }
            SyntaxKind::FOR_EACH_STATEMENT => {
                if let Some(token) = ForEachStatement::cast(node).and_then(|f| f.loop_variable()) {
                    push_implicit(&token, &mut seen, module_vars, &mut variables, text, index);
                }
            }
            _ => {}
        }
    }

    variables
}

fn push_implicit(
    token: &SyntaxToken,
    seen: &mut FxHashSet<SmolStr>,
    module_vars: &FxHashSet<SmolStr>,
    variables: &mut Vec<VariableSymbol>,
    text: &str,
    index: &LineIndex,
) {
    let key = case_fold(token.text());
    if module_vars.contains(&key) || !seen.insert(key) {
        return;
    }
    variables.push(VariableSymbol {
        name: SmolStr::new(token.text()),
        kind: VariableKind::LocalVariable,
        is_export: false,
        selection_range: token_range(token, text, index),
        description: None,
    });
}

fn token_range(token: &SyntaxToken, text: &str, index: &LineIndex) -> Range {
    index.range(text, token.text_range())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;
    use crate::syntax::parse;

    fn build(text: &str) -> SymbolTree {
        let file = SourceFile::cast(parse(text).syntax()).unwrap();
        let index = LineIndex::new(text);
        build_symbol_tree(&file, text, &index)
    }

    #[test]
    fn test_module_variables() {
        let tree = build("Перем Кэш Экспорт;\nПерем Внутренняя;");
        assert_eq!(tree.module_variables.len(), 2);
        assert!(tree.module_variables[0].is_export);
        assert!(!tree.module_variables[1].is_export);
    }

    #[test]
    fn test_method_with_params() {
        let tree = build(
            "Функция Вычислить(Знач База, Ставка = 20) Экспорт\n\
             \tВозврат База * Ставка;\n\
             КонецФункции",
        );
        let method = tree.method_named("вычислить").unwrap();
        assert_eq!(method.kind, MethodKind::Function);
        assert!(method.is_export);
        assert_eq!(method.params.len(), 2);
        assert!(method.params[0].by_value);
        assert!(method.params[1].has_default);
        assert_eq!(method.selection_range.start, Position::new(0, 8));
    }

    #[test]
    fn test_implicit_variable_from_assignment() {
        let tree = build(
            "Процедура Обработать()\n\
             \tНакопитель = 0;\n\
             \tНакопитель = Накопитель + 1;\n\
             КонецПроцедуры",
        );
        let method = &tree.methods[0];
        assert_eq!(method.variables.len(), 1);
        assert_eq!(method.variables[0].name, "Накопитель");
        // First assignment is the declaration site
        assert_eq!(method.variables[0].selection_range.start.line, 1);
    }

    #[test]
    fn test_loop_variables_are_declarations() {
        let tree = build(
            "Процедура Цикл()\n\
             \tДля Индекс = 1 По 5 Цикл\n\
             \tКонецЦикла;\n\
             \tДля Каждого Элемент Из Список Цикл\n\
             \tКонецЦикла;\n\
             КонецПроцедуры",
        );
        let names: Vec<_> = tree.methods[0]
            .variables
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert!(names.contains(&"Индекс"));
        assert!(names.contains(&"Элемент"));
    }

    #[test]
    fn test_assignment_to_module_variable_is_not_a_declaration() {
        let tree = build(
            "Перем Кэш;\n\
             Процедура Сбросить()\n\
             \tКэш = Неопределено;\n\
             КонецПроцедуры",
        );
        assert!(tree.methods[0].variables.is_empty());
    }

    #[test]
    fn test_parameter_is_not_redeclared_by_assignment() {
        let tree = build(
            "Процедура Настроить(Параметры)\n\
             \tПараметры = Новый Структура;\n\
             КонецПроцедуры",
        );
        assert!(tree.methods[0].variables.is_empty());
        assert_eq!(tree.methods[0].params.len(), 1);
    }

    #[test]
    fn test_method_description_deprecation() {
        let tree = build(
            "// Устарела. Используйте НоваяВерсия.\n\
             Функция Старая() Экспорт\n\
             \tВозврат 0;\n\
             КонецФункции",
        );
        let method = &tree.methods[0];
        assert!(method.is_deprecated());
        assert!(method
            .description
            .as_ref()
            .unwrap()
            .deprecation_info
            .contains("НоваяВерсия"));
    }

    #[test]
    fn test_explicit_local_with_description() {
        let tree = build(
            "Процедура П()\n\
             \t// временное хранилище\n\
             \tПерем Буфер;\n\
             \tБуфер = 1;\n\
             КонецПроцедуры",
        );
        let variables = &tree.methods[0].variables;
        assert_eq!(variables.len(), 1);
        assert_eq!(
            variables[0].description.as_deref(),
            Some("временное хранилище")
        );
    }
}
