// ffn_core/src/lib.rs

// Включаем строгие правила линтинга для всего крейта.
#![warn(
    missing_docs, // Предупреждать об отсутствующей документации для публичных элементов.
    clippy::all, // Все стандартные проверки Clippy.
    clippy::pedantic, // Более строгие ("педантичные") проверки Clippy.
    clippy::nursery // Экспериментальные проверки Clippy (могут быть нестабильны).
)]
// Запрещаем использование небезопасных конструкций и потенциально проблемных методов.
#![deny(
    unsafe_code, // Запрет `unsafe` блоков без явного `allow`.
    clippy::unwrap_used, // Запрет использования `.unwrap()`.
    clippy::expect_used // Запрет использования `.expect()`.
)]

//! # `ffn_core`
//!
//! Position-wise feed-forward блок трансформера на фреймворке [Burn](https://burn.dev/):
//! расширяющая проекция, функция активации, опциональный гейт (GLU-вариант),
//! дропаут и сжимающая проекция.
//!
//! Матричные умножения, выделение параметров, автоматическое дифференцирование
//! и генерация масок дропаута выполняет бэкенд Burn. Крейт задает только
//! композицию этих операций и политику гейта.
//!
//! ## Структура
//!
//! - `feed_forward`: `FeedForwardConfig` и слой `FeedForward`.
//! - `activation`: функции активации как значение конфигурации.
//! - `dropout`: дропаут с явно переданным режимом обучения/инференса.
//! - `error`: тип ошибок крейта.
//!
//! ## Пример
//!
//! ```ignore
//! let ffn = FeedForwardConfig::new(512, 2048)
//!     .with_gated(true)
//!     .init::<B>(&device)?;
//! let y = ffn.forward(x, /* training */ false);
//! ```

pub mod activation;
pub mod dropout;
pub mod error;
pub mod feed_forward;

// Реэкспортируем наиболее важные элементы для удобства потребителей крейта.
pub use activation::Activation;
pub use dropout::dropout;
pub use error::FfnError;
pub use feed_forward::{FeedForward, FeedForwardConfig, FeedForwardRecord, Projection};
