// ffn_cli/src/main.rs

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! `ffn-demo`: строит FFN-блок, прогоняет через него случайный батч и печатает
//! форму выхода, наличие гейта и число параметров.
//!
//! Значения берутся из TOML-конфигурации (`--config`), флаги командной строки
//! переопределяют их.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::{
    module::Module,
    tensor::{backend::Backend, Distribution, Tensor},
};
use clap::Parser;
use ffn_core::{Activation, FeedForwardConfig};
use tracing::{debug, info, warn};
use utils_crate::{
    config::{AppConfig, BlockConfigSub},
    init_tracing_logger, parse_level,
};

#[cfg(feature = "ndarray_backend_cli")]
type SelectedBackend = burn_ndarray::NdArray<f32>;

#[cfg(all(feature = "wgpu_backend_cli", not(feature = "ndarray_backend_cli")))]
type SelectedBackend = burn_wgpu::Wgpu;

/// Цели `tracing`, к которым применяется `--log-level`: сам бинарник и библиотека блока.
const LOG_TARGETS: [&str; 2] = [env!("CARGO_CRATE_NAME"), "ffn_core"];

#[cfg(not(any(feature = "ndarray_backend_cli", feature = "wgpu_backend_cli")))]
compile_error!("Выберите бэкенд: фича `ndarray_backend_cli` или `wgpu_backend_cli`.");

/// Аргументы командной строки.
#[derive(Parser, Debug)]
#[command(name = "ffn-demo", version, about = "Прогон position-wise feed-forward блока на случайном батче")]
struct Cli {
    /// Путь к TOML-файлу конфигурации.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Размерность модели.
    #[arg(long)]
    d_model: Option<usize>,
    /// Размерность промежуточного слоя.
    #[arg(long)]
    d_ff: Option<usize>,
    /// Вероятность дропаута, [0, 1).
    #[arg(long)]
    dropout: Option<f64>,
    /// Функция активации: relu, gelu, silu, tanh, sigmoid, identity.
    #[arg(long)]
    activation: Option<String>,
    /// Включить гейт (GLU-вариант).
    #[arg(long, conflicts_with = "ungated")]
    gated: bool,
    /// Выключить гейт.
    #[arg(long)]
    ungated: bool,
    /// Без смещения в расширяющей проекции.
    #[arg(long)]
    no_bias_expansion: bool,
    /// Без смещения в сжимающей проекции.
    #[arg(long)]
    no_bias_contraction: bool,
    /// Без смещения в проекции гейта.
    #[arg(long)]
    no_bias_gate: bool,
    /// Размер батча.
    #[arg(long)]
    batch: Option<usize>,
    /// Длина последовательности; без нее вход двумерный `[batch, d_model]`.
    #[arg(long)]
    seq_len: Option<usize>,
    /// Сид генератора бэкенда.
    #[arg(long)]
    seed: Option<u64>,
    /// Режим обучения (дропаут активен).
    #[arg(long)]
    train: bool,
    /// Уровень логирования.
    #[arg(long)]
    log_level: Option<String>,
    /// Директория для файлов логов.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    /// Накладывает флаги командной строки поверх загруженной конфигурации.
    fn apply_overrides(&self, config: &mut AppConfig) {
        let block = &mut config.block;
        if let Some(d_model) = self.d_model {
            block.d_model = d_model;
        }
        if let Some(d_ff) = self.d_ff {
            block.d_ff = d_ff;
        }
        if let Some(dropout) = self.dropout {
            block.dropout = dropout;
        }
        if let Some(activation) = &self.activation {
            block.activation.clone_from(activation);
        }
        if self.gated {
            block.gated = true;
        }
        if self.ungated {
            block.gated = false;
        }
        block.bias_expansion &= !self.no_bias_expansion;
        block.bias_contraction &= !self.no_bias_contraction;
        block.bias_gate &= !self.no_bias_gate;

        let run = &mut config.run;
        if let Some(batch) = self.batch {
            run.batch_size = batch;
        }
        if self.seq_len.is_some() {
            run.seq_len = self.seq_len;
        }
        if let Some(seed) = self.seed {
            run.seed = seed;
        }
        run.training |= self.train;

        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if let Some(dir) = &self.log_dir {
            config.logging.log_dir = Some(dir.to_string_lossy().into_owned());
        }
    }
}

/// Переводит секцию `[block]` в конфигурацию Burn.
fn block_config(block: &BlockConfigSub) -> Result<FeedForwardConfig> {
    let activation: Activation = block.activation.parse()?;
    Ok(FeedForwardConfig::new(block.d_model, block.d_ff)
        .with_dropout(block.dropout)
        .with_activation(activation)
        .with_gated(block.gated)
        .with_bias_expansion(block.bias_expansion)
        .with_bias_contraction(block.bias_contraction)
        .with_bias_gate(block.bias_gate))
}

fn run<B: Backend>(config: &AppConfig, device: &B::Device) -> Result<()> {
    B::seed(config.run.seed);

    let ffn = block_config(&config.block)?
        .init::<B>(device)
        .context("Не удалось построить FFN-блок")?;
    let (d_model, batch, training) = (ffn.d_model(), config.run.batch_size, config.run.training);
    let input_dist = Distribution::Normal(0.0, 1.0);

    let output_shape = match config.run.seq_len {
        None => {
            let x = Tensor::<B, 2>::random([batch, d_model], input_dist, device);
            ffn.try_forward(x, training)?.dims().to_vec()
        }
        Some(seq_len) => {
            let x = Tensor::<B, 3>::random([batch, seq_len, d_model], input_dist, device);
            ffn.try_forward(x, training)?.dims().to_vec()
        }
    };
    debug!(?output_shape, training, "прямой проход выполнен");

    println!("output shape: {output_shape:?}");
    println!("gated: {}", ffn.is_gated());
    println!("activation: {}", ffn.activation());
    println!("parameters: {}", ffn.num_params());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_toml(path)
            .with_context(|| format!("Не удалось загрузить конфигурацию из {}", path.display()))?,
        None => AppConfig::default(),
    };
    cli.apply_overrides(&mut config);

    let level = parse_level(&config.logging.level)?;
    let log_dir = config.logging.log_dir.as_ref().map(PathBuf::from);
    init_tracing_logger(LOG_TARGETS[0], &LOG_TARGETS[1..], level, level, log_dir.as_deref())?;
    if let Some(path) = cli.config.as_ref().filter(|p| !p.exists()) {
        warn!("Файл конфигурации {:?} не найден, использованы значения по умолчанию.", path);
    }

    config.validate()?;
    info!(
        d_model = config.block.d_model,
        d_ff = config.block.d_ff,
        gated = config.block.gated,
        batch = config.run.batch_size,
        seq_len = ?config.run.seq_len,
        "Запуск ffn-demo"
    );

    let device = <SelectedBackend as Backend>::Device::default();
    run::<SelectedBackend>(&config, &device)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "ffn-demo",
            "--d-model",
            "16",
            "--activation",
            "gelu",
            "--ungated",
            "--no-bias-gate",
            "--seq-len",
            "5",
            "--train",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.block.d_model, 16);
        assert_eq!(config.block.d_ff, 2048);
        assert!(!config.block.gated);
        assert!(!config.block.bias_gate);
        assert!(config.block.bias_expansion);
        assert_eq!(config.run.seq_len, Some(5));
        assert!(config.run.training);

        let ffn_config = block_config(&config.block).unwrap();
        assert_eq!(ffn_config.activation, Activation::Gelu);
        assert!(!ffn_config.gated);
    }

    // Цель события - путь модуля; ее корень должен совпадать с одной из директив.
    fn covered(path: &str) -> bool {
        let root = path.split("::").next().unwrap();
        LOG_TARGETS.contains(&root)
    }

    #[test]
    fn test_log_targets_cover_binary_and_block() {
        assert!(covered(module_path!()), "{} не покрыт {:?}", module_path!(), LOG_TARGETS);
        let block_path = std::any::type_name::<FeedForwardConfig>();
        assert!(covered(block_path), "{block_path} не покрыт {:?}", LOG_TARGETS);
    }

    #[test]
    fn test_gated_and_ungated_conflict() {
        assert!(Cli::try_parse_from(["ffn-demo", "--gated", "--ungated"]).is_err());
    }

    #[test]
    fn test_unknown_activation_is_an_error() {
        let block = BlockConfigSub {
            activation: "softmax".to_string(),
            ..BlockConfigSub::default()
        };
        assert!(block_config(&block).is_err());
    }
}
