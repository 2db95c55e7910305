//! Common BSL source fixtures for tests.

/// A documented export function. The declaration name `Сложить` sits on
/// line 4, columns 8..15.
pub const MATH_MODULE: &str = "\
// Складывает два числа.
//
// Возвращаемое значение:
//  Число - сумма
Функция Сложить(А, Б) Экспорт
    Возврат А + Б;
КонецФункции";

/// Conventional path of the catalog manager module holding
/// [`MANAGER_CALLER`].
pub const MANAGER_PATH: &str = "/conf/Catalogs/Товары/Ext/ManagerModule.bsl";

/// Calls `Математика.Сложить` through the module name. The called method
/// name sits on line 1, columns 23..30.
pub const MANAGER_CALLER: &str = "\
Функция ЦенаСоСкидкой(Цена) Экспорт
    Возврат Математика.Сложить(Цена, 10);
КонецФункции";

/// An assignment of a plain numeric literal, flagged by the magic number
/// rule with default settings and by nothing else. The literal sits on
/// line 1.
pub const NOISY_MODULE: &str = "\
Процедура Обработать() Экспорт
    Порог = 99;
КонецПроцедуры";
