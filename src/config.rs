//! Configuration for representation dispatch and result building

use num_traits::Zero;

/// What a sparse builder does with values that are exactly zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Zeros produced by cancellation are not stored
    DropExplicitZeros,
    /// Every emitted position is stored, even when its value is zero
    KeepExplicitZeros,
}

impl ZeroPolicy {
    /// Whether a value should be stored in a sparse result
    pub fn keeps<T: Zero>(&self, value: &T) -> bool {
        match self {
            ZeroPolicy::DropExplicitZeros => !value.is_zero(),
            ZeroPolicy::KeepExplicitZeros => true,
        }
    }
}

impl Default for ZeroPolicy {
    fn default() -> Self {
        ZeroPolicy::DropExplicitZeros
    }
}

/// Configuration for the representation dispatcher
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Treatment of explicit zeros in sparse results
    pub zero_policy: ZeroPolicy,

    /// Whether an unregistered `(A, B)` pair may fall back to the
    /// registered `(B, A)` handler
    pub allow_mirrored: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            zero_policy: ZeroPolicy::default(),
            allow_mirrored: true,
        }
    }
}

impl DispatchConfig {
    /// Only directly registered kind pairs are accepted
    pub fn strict() -> Self {
        Self {
            allow_mirrored: false,
            ..Self::default()
        }
    }

    pub fn with_zero_policy(mut self, zero_policy: ZeroPolicy) -> Self {
        self.zero_policy = zero_policy;
        self
    }
}
