// ffn_core/src/error.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

/// Перечисление всех возможных ошибок крейта `ffn_core`.
///
/// Ошибки тензорных операций Burn здесь не агрегируются: бэкенд сообщает о
/// нарушении контракта паникой, и [`FeedForward::forward`](crate::FeedForward::forward)
/// пропускает ее без изменений. Проверяемые варианты возвращают
/// [`FfnError::IncompatibleShape`] до обращения к бэкенду.
#[derive(thiserror::Error, Debug)]
pub enum FfnError {
    /// Некорректная конфигурация блока: нулевые размерности, вероятность
    /// дропаута вне `[0, 1)`, либо операция, не совместимая с конфигурацией
    /// (например, загрузка весов гейта в блок без гейта).
    #[error("Некорректная конфигурация: {0}")]
    InvalidConfig(String),

    /// Несовместимые размеры тензоров: последняя размерность входа не равна
    /// `d_model` или загружаемый вес не совпадает по форме с существующим.
    #[error("Несовместимые размеры или форма тензора: {0}")]
    IncompatibleShape(String),
}
