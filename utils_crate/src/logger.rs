#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![deny(unsafe_code, unused_mut, unused_imports, unused_attributes)]

//! Модуль для инициализации глобального логгера на основе `tracing`.
//!
//! Функциональность этого модуля активируется фичей `logger_utils_feature`.

use std::{fs, io, path::Path};

use tracing::Level;
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::error::UtilsError;

/// Строит директиву вида `app_name=level` для `EnvFilter`.
fn app_directive(app_name: &str, level: Level) -> Result<Directive, UtilsError> {
    // EnvFilter не принимает дефисы в именах целей.
    let target = app_name.replace('-', "_");
    format!("{target}={level}").parse().map_err(|e| {
        UtilsError::InvalidParameter(format!(
            "Неверная директива логирования для '{app_name}': {e}"
        ))
    })
}

/// Базовый фильтр из `RUST_LOG` (по умолчанию `info`) с уровнем для `app_name`
/// и `extra_targets` поверх.
fn app_filter(app_name: &str, extra_targets: &[&str], level: Level) -> Result<EnvFilter, UtilsError> {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    for target in std::iter::once(app_name).chain(extra_targets.iter().copied()) {
        filter = filter.add_directive(app_directive(target, level)?);
    }
    Ok(filter)
}

/// Инициализирует глобальный подписчик `tracing`.
///
/// Настраивает вывод в консоль (stderr) и, опционально, в файл с ежедневной ротацией.
/// Базовый фильтр берется из `RUST_LOG` (по умолчанию `info`), поверх него
/// добавляется явный уровень для `app_name` и для каждой цели из `extra_targets`.
///
/// # Аргументы
/// * `app_name` - Имя приложения (цель фильтра и префикс имени файла лога).
///   Для бинарника это имя его крейта (`env!("CARGO_CRATE_NAME")`), а не пакета.
/// * `extra_targets` - Дополнительные цели (обычно библиотечные крейты) с тем же уровнем.
/// * `console_level` - Уровень для консоли.
/// * `file_level` - Уровень для файла.
/// * `log_dir` - Опциональная директория для файлов логов.
///
/// # Ошибки
/// `UtilsError::InvalidParameter` для имени приложения, из которого не собирается
/// директива фильтра; `UtilsError::Generic`, если глобальный подписчик уже установлен.
/// Если директорию логов создать не удалось, логирование продолжается только в консоль.
#[allow(clippy::module_name_repetitions)]
pub fn init_tracing_logger(
    app_name: &str,
    extra_targets: &[&str],
    console_level: Level,
    file_level: Level,
    log_dir: Option<&Path>,
) -> Result<(), UtilsError> {
    let console_filter = app_filter(app_name, extra_targets, console_level)?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync + 'static>> = Vec::new();
    layers.push(
        fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_filter(console_filter)
            .boxed(),
    );

    let mut file_dir_ready = false;
    if let Some(dir) = log_dir {
        match fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender =
                    tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
                let file_filter = app_filter(app_name, extra_targets, file_level)?;
                layers.push(
                    fmt::layer()
                        .with_writer(file_appender)
                        .with_ansi(false)
                        .with_filter(file_filter)
                        .boxed(),
                );
                file_dir_ready = true;
            }
            Err(e) => {
                // tracing еще не инициализирован.
                eprintln!(
                    "[ПРЕДУПРЕЖДЕНИЕ] Не удалось создать директорию логов {dir:?}: {e}. Логирование в файл отключено."
                );
            }
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| UtilsError::Generic(format!("Не удалось инициализировать логгер: {e}")))?;

    match log_dir {
        Some(dir) if file_dir_ready => tracing::info!(
            "Логгер инициализирован. Уровень консоли: {}. Логирование в файл: {:?} (уровень {}).",
            console_level,
            dir,
            file_level
        ),
        Some(dir) => tracing::warn!(
            "Логгер инициализирован. Уровень консоли: {}. Директория {:?} недоступна, файл не ведется.",
            console_level,
            dir
        ),
        None => tracing::info!(
            "Логгер инициализирован. Только вывод в консоль (уровень {}).",
            console_level
        ),
    }
    Ok(())
}

/// Разбирает строковый уровень логирования (`"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`).
///
/// # Ошибки
/// `UtilsError::InvalidParameter` для неизвестного уровня.
pub fn parse_level(level: &str) -> Result<Level, UtilsError> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|_| UtilsError::InvalidParameter(format!("Неизвестный уровень логирования: '{level}'")))
}
