// ffn_core/src/feed_forward.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Position-wise feed-forward блок трансформера.
//!
//! Блок расширяет признаки до `d_ff`, применяет активацию, опционально умножает
//! результат на гейт (вариант Gated Linear Unit), применяет дропаут и сжимает
//! обратно до `d_model`:
//!
//! ```text
//! out = W2 · dropout( act(x·W1 + b1) ⊙ (x·Wg + bg) ) + b2   // gated
//! out = W2 · dropout( act(x·W1 + b1) ) + b2                  // ungated
//! ```
//!
//! Гейт считается от исходного входа `x`, а не от `act(x·W1 + b1)`.

use std::fmt;

use burn::{
    config::Config,
    module::{Ignored, Module, Param},
    nn::{Initializer, Linear, LinearConfig},
    tensor::{backend::Backend, Tensor},
};
use tracing::debug;

use crate::{activation::Activation, dropout::dropout, error::FfnError};

/// Конфигурация для слоя [`FeedForward`].
#[derive(Config, Debug)]
pub struct FeedForwardConfig {
    /// Размерность модели (входная и выходная размерность блока).
    pub d_model: usize,
    /// Размерность промежуточного слоя (обычно в 2-4 раза больше `d_model`).
    pub d_ff: usize,
    /// Вероятность дропаута после активации (и гейта), `[0, 1)`.
    #[config(default = 0.1)]
    pub dropout: f64,
    /// Функция активации расширяющей проекции.
    #[config(default = "Activation::Relu")]
    pub activation: Activation,
    /// Добавить проекцию гейта (GLU-вариант).
    #[config(default = false)]
    pub gated: bool,
    /// Смещение в расширяющей проекции `d_model -> d_ff`.
    #[config(default = true)]
    pub bias_expansion: bool,
    /// Смещение в сжимающей проекции `d_ff -> d_model`.
    #[config(default = true)]
    pub bias_contraction: bool,
    /// Смещение в проекции гейта. Игнорируется, если `gated == false`.
    #[config(default = true)]
    pub bias_gate: bool,
    /// Инициализатор весов всех проекций. `None` означает инициализатор Burn по умолчанию.
    #[config(default = "None")]
    pub initializer: Option<Initializer>,
}

impl FeedForwardConfig {
    /// Проверяет конфигурацию, не выделяя памяти.
    ///
    /// # Ошибки
    /// `FfnError::InvalidConfig`, если `d_model` или `d_ff` равны нулю либо
    /// `dropout` не лежит в `[0, 1)` (включая `NaN`).
    pub fn validate(&self) -> Result<(), FfnError> {
        if self.d_model == 0 || self.d_ff == 0 {
            return Err(FfnError::InvalidConfig(format!(
                "d_model и d_ff должны быть > 0 (получено d_model={}, d_ff={})",
                self.d_model, self.d_ff
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(FfnError::InvalidConfig(format!(
                "вероятность дропаута должна лежать в [0, 1), получено {}",
                self.dropout
            )));
        }
        Ok(())
    }

    /// Создает новый экземпляр [`FeedForward`].
    ///
    /// Проекция гейта выделяется только при `gated == true`.
    ///
    /// # Аргументы
    /// * `device`: Устройство Burn, на котором будут инициализированы веса.
    ///
    /// # Ошибки
    /// См. [`FeedForwardConfig::validate`]; при ошибке ничего не выделяется.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<FeedForward<B>, FfnError> {
        self.validate()?;

        let expansion = self.projection(self.d_model, self.d_ff, self.bias_expansion, device);
        let gate = self
            .gated
            .then(|| self.projection(self.d_model, self.d_ff, self.bias_gate, device));
        let contraction = self.projection(self.d_ff, self.d_model, self.bias_contraction, device);

        debug!(
            d_model = self.d_model,
            d_ff = self.d_ff,
            gated = self.gated,
            activation = %self.activation,
            dropout = self.dropout,
            "FFN-блок инициализирован"
        );

        Ok(FeedForward {
            expansion,
            gate,
            contraction,
            activation: Ignored(self.activation),
            dropout_prob: self.dropout,
            d_model: self.d_model,
            d_ff: self.d_ff,
        })
    }

    fn projection<B: Backend>(
        &self,
        d_input: usize,
        d_output: usize,
        bias: bool,
        device: &B::Device,
    ) -> Linear<B> {
        let config = LinearConfig::new(d_input, d_output).with_bias(bias);
        let config = match &self.initializer {
            Some(initializer) => config.with_initializer(initializer.clone()),
            None => config,
        };
        config.init(device)
    }
}

/// Одна из трех линейных проекций блока.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// `d_model -> d_ff`, перед активацией.
    Expansion,
    /// `d_model -> d_ff`, множитель GLU-варианта.
    Gate,
    /// `d_ff -> d_model`, выходная.
    Contraction,
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Expansion => "expansion",
            Self::Gate => "gate",
            Self::Contraction => "contraction",
        })
    }
}

/// Position-wise feed-forward слой.
///
/// Формы весов фиксируются при построении: `expansion` и `gate` имеют вес
/// `[d_model, d_ff]`, `contraction` имеет вес `[d_ff, d_model]`. Слой не хранит
/// ссылок на входы между вызовами; прямой проход берет `&self`, изменение весов
/// требует `&mut self`.
#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    /// Расширяющая проекция.
    expansion: Linear<B>,
    /// Проекция гейта, есть только у GLU-варианта.
    gate: Option<Linear<B>>,
    /// Сжимающая (выходная) проекция.
    contraction: Linear<B>,
    /// Функция активации.
    activation: Ignored<Activation>,
    /// Вероятность дропаута; режим задает вызывающий.
    dropout_prob: f64,
    d_model: usize,
    d_ff: usize,
}

impl<B: Backend> FeedForward<B> {
    /// Выполняет прямой проход.
    ///
    /// # Аргументы
    /// * `input`: Тензор любого ранга, последняя размерность равна `d_model`;
    ///   ведущие размерности (батч, последовательность) проходят без изменений.
    /// * `training`: `true` включает дропаут, `false` делает его тождественным.
    ///
    /// # Возвращает
    /// Тензор той же формы, что и входной.
    ///
    /// # Паника
    /// Если последняя размерность входа не равна `d_model`, паникует бэкенд при
    /// умножении матриц. Используйте [`FeedForward::try_forward`], чтобы получить ошибку.
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>, training: bool) -> Tensor<B, D> {
        // 1-2. Активация расширения, затем умножение на гейт от исходного входа.
        let combined = match &self.gate {
            Some(gate) => {
                let expanded = self.expand(input.clone());
                expanded.mul(gate.forward(input))
            }
            None => self.expand(input),
        };

        // 3. Дропаут.
        let dropped = dropout(combined, self.dropout_prob, training);

        // 4. Сжатие обратно до d_model.
        self.contraction.forward(dropped)
    }

    /// Прямой проход с проверкой формы входа.
    ///
    /// # Ошибки
    /// `FfnError::IncompatibleShape`, если последняя размерность входа не равна `d_model`.
    pub fn try_forward<const D: usize>(
        &self,
        input: Tensor<B, D>,
        training: bool,
    ) -> Result<Tensor<B, D>, FfnError> {
        let dims = input.dims();
        match dims.last() {
            Some(&last) if last == self.d_model => Ok(self.forward(input, training)),
            _ => Err(FfnError::IncompatibleShape(format!(
                "ожидалась последняя размерность {}, получена форма {:?}",
                self.d_model, dims
            ))),
        }
    }

    fn expand<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        self.activation.apply(self.expansion.forward(input))
    }

    /// Заменяет вес и смещение одной из проекций.
    ///
    /// Формы новых тензоров должны совпадать с текущими, а наличие смещения
    /// должно соответствовать конфигурации, с которой построен блок.
    ///
    /// # Ошибки
    /// * `FfnError::InvalidConfig`: загрузка гейта в блок без гейта, либо
    ///   смещение передано (не передано) для проекции без смещения (со смещением).
    /// * `FfnError::IncompatibleShape`: форма веса или смещения не совпадает.
    pub fn load_projection(
        &mut self,
        projection: Projection,
        weight: Tensor<B, 2>,
        bias: Option<Tensor<B, 1>>,
    ) -> Result<(), FfnError> {
        let linear = match projection {
            Projection::Expansion => &mut self.expansion,
            Projection::Contraction => &mut self.contraction,
            Projection::Gate => self.gate.as_mut().ok_or_else(|| {
                FfnError::InvalidConfig("у блока без гейта нет проекции gate".to_string())
            })?,
        };

        let expected = linear.weight.dims();
        if weight.dims() != expected {
            return Err(FfnError::IncompatibleShape(format!(
                "вес {projection}: ожидалась форма {expected:?}, получена {:?}",
                weight.dims()
            )));
        }

        match (&linear.bias, &bias) {
            (Some(current), Some(new)) if current.dims() != new.dims() => {
                return Err(FfnError::IncompatibleShape(format!(
                    "смещение {projection}: ожидалась форма {:?}, получена {:?}",
                    current.dims(),
                    new.dims()
                )));
            }
            (Some(_), None) => {
                return Err(FfnError::InvalidConfig(format!(
                    "проекция {projection} построена со смещением, а смещение не передано"
                )));
            }
            (None, Some(_)) => {
                return Err(FfnError::InvalidConfig(format!(
                    "проекция {projection} построена без смещения"
                )));
            }
            _ => {}
        }

        linear.weight = Param::from_tensor(weight);
        linear.bias = bias.map(Param::from_tensor);
        debug!(%projection, shape = ?expected, "веса проекции загружены");
        Ok(())
    }

    /// Размерность модели.
    pub const fn d_model(&self) -> usize {
        self.d_model
    }

    /// Размерность промежуточного слоя.
    pub const fn d_ff(&self) -> usize {
        self.d_ff
    }

    /// Есть ли у блока проекция гейта.
    pub const fn is_gated(&self) -> bool {
        self.gate.is_some()
    }

    /// Вероятность дропаута.
    pub const fn dropout_prob(&self) -> f64 {
        self.dropout_prob
    }

    /// Функция активации.
    pub fn activation(&self) -> Activation {
        *self.activation
    }

    /// Расширяющая проекция `d_model -> d_ff`.
    pub const fn expansion_projection(&self) -> &Linear<B> {
        &self.expansion
    }

    /// Проекция гейта; `None` у блока без гейта.
    pub const fn gate_projection(&self) -> Option<&Linear<B>> {
        self.gate.as_ref()
    }

    /// Сжимающая проекция `d_ff -> d_model`.
    pub const fn contraction_projection(&self) -> &Linear<B> {
        &self.contraction
    }
}
