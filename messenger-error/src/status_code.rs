use std::fmt;

/// Коды статуса для категоризации ошибок реестра.
///
/// # Диапазоны:
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных
/// - 4xxx: Ограничения (лимиты подписчиков)
/// - 9xxx: Конфигурация
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 1xxx: Общие ошибки ===
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Ошибки данных ===
    SerializationFailed = 2001,
    HandlerFailed = 2002,

    // === 4xxx: Ограничения ===
    SubscriberLimitExceeded = 4003,

    // === 9xxx: Конфигурация ===
    InvalidConfig = 9000,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет получение числового представления и конвертацию
    /// `From<StatusCode> for u32`.
    #[test]
    fn test_code_and_into() {
        let c = StatusCode::HandlerFailed;
        assert_eq!(c.code(), 2002);
        let n: u32 = c.into();
        assert_eq!(n, 2002);
        assert_eq!(StatusCode::InvalidConfig.code(), 9000);
    }

    /// Тест проверяет формат `Display` — строка должна содержать имя варианта и
    /// числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::InvalidArgs);
        assert!(s.contains("1004"), "Display must contain code 1004, got: {s}");
        assert!(
            s.contains("InvalidArgs"),
            "Display must contain variant name 'InvalidArgs', got: {s}"
        );
    }
}
