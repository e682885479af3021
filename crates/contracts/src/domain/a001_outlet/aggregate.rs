use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор аутлета (присваивается бэкендом, непрозрачная строка)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutletId(pub String);

impl OutletId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OutletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Аутлет (торговая точка) — справочная запись для сопоставления строк импорта.
///
/// Идентичность при сопоставлении — пара (code, line_of_business): один и тот же
/// code может выдаваться по одному разу на каждую линию бизнеса.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outlet {
    pub id: OutletId,

    /// Короткий код, назначается вручную (буквы/цифры, пробел, дефис, подчёркивание)
    pub code: String,

    /// Отображаемое имя (не уникально)
    pub name: String,

    /// Линия бизнеса: "Cafe", "Premiere", "Hello Sunday", ...
    #[serde(rename = "lineOfBusiness")]
    pub line_of_business: String,
}

impl Outlet {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        line_of_business: impl Into<String>,
    ) -> Self {
        Self {
            id: OutletId::new(id),
            code: code.into(),
            name: name.into(),
            line_of_business: line_of_business.into(),
        }
    }
}
