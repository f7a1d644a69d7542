#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![deny(unsafe_code, unused_mut, unused_imports, unused_attributes)]

//! Конфигурация приложения, загружаемая из TOML.
//!
//! Модуль намеренно не зависит от `ffn_core`: параметры блока хранятся здесь
//! в виде простых типов, а в `FeedForwardConfig` их переводит вызывающий код.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::UtilsError;

/// Глобальная конфигурация приложения.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Гиперпараметры FFN-блока.
    pub block: BlockConfigSub,
    /// Параметры прогона (размер батча, сид, режим).
    pub run: RunConfigSub,
    /// Конфигурация логирования.
    pub logging: LoggingConfigSub,
}

/// Гиперпараметры FFN-блока (под-конфигурация для `AppConfig`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlockConfigSub {
    /// Ширина модели (вход и выход блока).
    pub d_model: usize,
    /// Ширина скрытого слоя.
    pub d_ff: usize,
    /// Вероятность дропаута, `[0, 1)`.
    pub dropout: f64,
    /// Имя функции активации (`relu`, `gelu`, `silu`, `tanh`, `sigmoid`, `identity`).
    pub activation: String,
    /// Включить гейт (GLU-вариант).
    pub gated: bool,
    /// Смещение в расширяющей проекции.
    pub bias_expansion: bool,
    /// Смещение в сжимающей проекции.
    pub bias_contraction: bool,
    /// Смещение в проекции гейта.
    pub bias_gate: bool,
}

impl Default for BlockConfigSub {
    fn default() -> Self {
        Self {
            d_model: 512,
            d_ff: 2048,
            dropout: 0.1,
            activation: "relu".to_string(),
            gated: true,
            bias_expansion: true,
            bias_contraction: true,
            bias_gate: true,
        }
    }
}

/// Параметры одного прогона демо (под-конфигурация для `AppConfig`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfigSub {
    /// Число последовательностей в батче.
    pub batch_size: usize,
    /// Длина последовательности; `None` означает двумерный вход `[batch, d_model]`.
    pub seq_len: Option<usize>,
    /// Сид генератора случайных чисел бэкенда.
    pub seed: u64,
    /// Режим обучения (дропаут активен).
    pub training: bool,
}

impl Default for RunConfigSub {
    fn default() -> Self {
        Self {
            batch_size: 10,
            seq_len: None,
            seed: 42,
            training: false,
        }
    }
}

/// Конфигурация логирования (под-конфигурация для `AppConfig`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfigSub {
    /// Уровень логирования.
    pub level: String,
    /// Директория для файлов логов (опционально).
    pub log_dir: Option<String>,
}

impl Default for LoggingConfigSub {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Загружает конфигурацию приложения из TOML файла.
    /// Если файл не найден, возвращается конфигурация по умолчанию.
    ///
    /// # Errors
    /// `UtilsError::Io` при ошибках чтения файла, `UtilsError::Config`
    /// при ошибках парсинга TOML.
    pub fn load_from_toml(file_path: &Path) -> Result<Self, UtilsError> {
        if !file_path.exists() {
            warn!(
                "Файл конфигурации не найден: {:?}, используются значения по умолчанию.",
                file_path
            );
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(file_path)
            .map_err(|e| UtilsError::io_with_path(e, file_path.to_string_lossy()))?;
        let config: Self = toml::from_str(&config_str).map_err(|e| {
            UtilsError::Config(format!(
                "Failed to parse AppConfig from TOML at {file_path:?}: {e}"
            ))
        })?;
        debug!(?config, "Конфигурация загружена из {:?}", file_path);
        Ok(config)
    }

    /// Проверяет значения, которые TOML пропускает, а блок и прогон не допускают.
    ///
    /// # Errors
    /// `UtilsError::InvalidParameter` с описанием первого найденного нарушения.
    pub fn validate(&self) -> Result<(), UtilsError> {
        if self.block.d_model == 0 || self.block.d_ff == 0 {
            return Err(UtilsError::InvalidParameter(format!(
                "block.d_model и block.d_ff должны быть > 0 (получено {} и {})",
                self.block.d_model, self.block.d_ff
            )));
        }
        if !(0.0..1.0).contains(&self.block.dropout) {
            return Err(UtilsError::InvalidParameter(format!(
                "block.dropout должен лежать в [0, 1), получено {}",
                self.block.dropout
            )));
        }
        if self.run.batch_size == 0 || self.run.seq_len == Some(0) {
            return Err(UtilsError::InvalidParameter(
                "run.batch_size и run.seq_len должны быть > 0".to_string(),
            ));
        }
        Ok(())
    }
}
