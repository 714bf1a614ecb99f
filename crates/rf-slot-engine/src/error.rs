//! Error types for the slot engine

use thiserror::Error;

use crate::spin::SpinMode;
use crate::symbols::SymbolId;

/// Configuration error, raised while loading or validating a game config.
///
/// These are fatal for the hosting application: an engine is never
/// constructed from a config that fails validation, so no spin can observe one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("Limit exceeded: {0}")]
    Limit(String),

    #[error("Invalid grid: {reels}×{rows}")]
    InvalidGrid { reels: u8, rows: u8 },

    #[error("Invalid minimum match length {min} for a grid with {reels} reels")]
    InvalidMatchLength { min: u8, reels: u8 },

    #[error("Duplicate symbol id {0}")]
    DuplicateSymbol(SymbolId),

    #[error("Unknown symbol id {symbol} referenced by {context}")]
    UnknownSymbol { symbol: SymbolId, context: String },

    #[error("Symbol {symbol} has an invalid weight {weight}")]
    InvalidWeight { symbol: SymbolId, weight: f64 },

    #[error("Weights of {0} sum to zero")]
    ZeroWeightSum(String),

    #[error("Symbol {symbol} pays for {count} symbols, below the minimum match length {min}")]
    PayoutBelowMinimum { symbol: SymbolId, count: u8, min: u8 },

    #[error("Symbol {symbol} has an invalid payout {pay} for {count} symbols")]
    InvalidPayout { symbol: SymbolId, count: u8, pay: f64 },

    #[error("Expected {expected} reel strips for {mode:?}, found {found}")]
    ReelCountMismatch {
        mode: SpinMode,
        expected: u8,
        found: usize,
    },

    #[error("Reel strip {reel} for {mode:?} is empty")]
    EmptyReelStrip { mode: SpinMode, reel: u8 },

    #[error("Malformed payline {index}: {reason}")]
    MalformedPayline { index: usize, reason: String },

    #[error("Giant symbol {width}×{height} does not fit a {reels}×{rows} grid")]
    GiantOutOfBounds {
        width: u8,
        height: u8,
        reels: u8,
        rows: u8,
    },

    #[error("Giant symbol width {width} must be smaller than the minimum match length {min}")]
    GiantWiderThanMatch { width: u8, min: u8 },

    #[error("No symbol is eligible to appear as a giant symbol")]
    NoGiantSymbols,

    #[error("Invalid probability {value} for {name}")]
    InvalidProbability { name: String, value: f64 },

    #[error("Invalid multiplier {value} in {context}")]
    InvalidMultiplier { context: String, value: f64 },

    #[error("Wild meter threshold is set but no meter multipliers are configured")]
    MissingMeterMultipliers,

    #[error("Symbol {0} is mapped to both respin and bonus wheel")]
    ConflictingReelSymbol(SymbolId),

    #[error("Invalid stake range: min {min}, max {max}")]
    InvalidStakeRange { min: f64, max: f64 },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Rejection of a single engine call.
///
/// Always raised before any random draw, so the caller's meter state and
/// random source are left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpinError {
    #[error("Stake {stake} outside the allowed range {min}..={max}")]
    InvalidStake { stake: f64, min: f64, max: f64 },

    #[error("Free spin requested with no free spins remaining")]
    NoFreeSpinsRemaining,

    #[error("Game has no bonus wheel configured")]
    BonusWheelUnavailable,

    #[error("Invalid base win {0}")]
    InvalidBaseWin(f64),

    #[error("Respin of a {expected:?} spin requested as {requested:?}")]
    RespinModeMismatch { expected: SpinMode, requested: SpinMode },
}
