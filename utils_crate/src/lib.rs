#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![deny(unsafe_code, unused_mut, unused_imports, unused_attributes)]

//! `utils_crate` предоставляет общую обработку ошибок, инициализацию логирования
//! и конфигурацию приложения для воркспейса `ffn-block`.
//!
//! # Основные модули:
//!
//! - [`error`]: Общий тип ошибки `UtilsError`.
//! - [`config`]: (фича `config_toml`) `AppConfig`, загружаемый из TOML-файла.
//! - [`logger`]: (фича `logger_utils_feature`) Инициализация логирования на базе `tracing`.
//!
//! # Использование фич (Features)
//!
//! ```toml
//! # В Cargo.toml вашего крейта
//! # utils_crate = { path = "../utils_crate", default-features = false, features = ["logger_utils_feature"] }
//! ```

// --- Модуль для общих ошибок ---
pub mod error;
pub use error::UtilsError;

/// Модуль с утилитами для инициализации логирования.
///
/// Активируется фичей `logger_utils_feature`.
#[cfg(feature = "logger_utils_feature")]
pub mod logger;
#[cfg(feature = "logger_utils_feature")]
pub use logger::{init_tracing_logger, parse_level};

/// Модуль для загрузки конфигурации приложения.
///
/// Активируется фичей `config_toml`.
#[cfg(feature = "config_toml")]
pub mod config;
#[cfg(feature = "config_toml")]
pub use config::AppConfig;
