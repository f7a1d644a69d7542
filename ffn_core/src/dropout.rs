// ffn_core/src/dropout.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Дропаут с явно переданным режимом.
//!
//! `burn::nn::Dropout::forward` решает, активен ли дропаут, по тому, включен ли
//! autodiff у бэкенда. Здесь режим передается аргументом, поэтому один и тот же
//! модуль можно прогнать и в режиме обучения, и в режиме инференса на любом бэкенде.

use burn::tensor::{backend::Backend, Distribution, Tensor};

/// Применяет дропаут к `input`.
///
/// В режиме обучения каждый элемент независимо обнуляется с вероятностью `prob`,
/// а выжившие умножаются на `1 / (1 - prob)`, так что матожидание сохраняется.
/// При `training == false` или `prob == 0` вход возвращается без изменений.
///
/// Маска берется из генератора бэкенда (`Backend::seed` задает его состояние).
/// Вызывающий код отвечает за `prob` в `[0, 1)`; `FeedForwardConfig` проверяет это
/// при построении блока.
pub fn dropout<B: Backend, const D: usize>(
    input: Tensor<B, D>,
    prob: f64,
    training: bool,
) -> Tensor<B, D> {
    if !training || prob <= 0.0 {
        return input;
    }

    let prob_keep = 1.0 - prob;
    let mask = input.random_like(Distribution::Bernoulli(prob_keep));
    input.mul(mask).mul_scalar(1.0 / prob_keep)
}
