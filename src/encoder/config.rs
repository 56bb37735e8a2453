use std::sync::OnceLock;

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

static STRATEGY_PRUNE_BITS: OnceLock<f64> = OnceLock::new();

/// Assumed minimum cost of each not-yet-assigned character when pruning
/// strategy enumeration. Numeric amortized cost by default.
pub fn strategy_prune_bits_per_char() -> f64 {
    *STRATEGY_PRUNE_BITS
        .get_or_init(|| parse_env_f64("QR_STRATEGY_PRUNE_BITS", 10.0 / 3.0).clamp(0.0, 64.0))
}

static MAX_STRATEGIES: OnceLock<usize> = OnceLock::new();

pub fn max_strategies() -> usize {
    *MAX_STRATEGIES.get_or_init(|| parse_env_usize("QR_MAX_STRATEGIES", 4096).max(1))
}
