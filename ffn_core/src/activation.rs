// ffn_core/src/activation.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Функции активации, выбираемые как значение конфигурации.

use std::{fmt, str::FromStr};

use burn::tensor::{activation, backend::Backend, Tensor};
use serde::{Deserialize, Serialize};

use crate::error::FfnError;

/// Поэлементная функция активации расширяющей проекции.
///
/// Все варианты без обучаемого состояния, поэтому одно значение можно
/// безопасно разделять между любым числом блоков.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activation {
    /// `max(0, x)`.
    #[default]
    Relu,
    /// Gaussian Error Linear Unit.
    Gelu,
    /// `x * sigmoid(x)` (Swish).
    Silu,
    /// Гиперболический тангенс.
    Tanh,
    /// Логистическая функция.
    Sigmoid,
    /// Тождественное отображение (линейный блок).
    Identity,
}

impl Activation {
    /// Применяет активацию к тензору любого ранга.
    pub fn apply<B: Backend, const D: usize>(self, tensor: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Self::Relu => activation::relu(tensor),
            Self::Gelu => activation::gelu(tensor),
            Self::Silu => activation::silu(tensor),
            Self::Tanh => tensor.tanh(),
            Self::Sigmoid => activation::sigmoid(tensor),
            Self::Identity => tensor,
        }
    }

    /// Каноническое имя, совпадающее с serde-представлением.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::Gelu => "gelu",
            Self::Silu => "silu",
            Self::Tanh => "tanh",
            Self::Sigmoid => "sigmoid",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = FfnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(Self::Relu),
            "gelu" => Ok(Self::Gelu),
            "silu" | "swish" => Ok(Self::Silu),
            "tanh" => Ok(Self::Tanh),
            "sigmoid" => Ok(Self::Sigmoid),
            "identity" | "linear" => Ok(Self::Identity),
            other => Err(FfnError::InvalidConfig(format!(
                "Неизвестная функция активации: '{other}'"
            ))),
        }
    }
}
