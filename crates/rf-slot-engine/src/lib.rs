//! # rf-slot-engine: Slot Outcome & Payout Engine
//!
//! Deterministic slot machine core: weighted symbol draws, grid assembly with
//! giant symbols, payline and adjacency win detection, cascade resolution,
//! wild/scatter meters, multiplier reel, bonus wheel and payout aggregation.
//!
//! ## Architecture
//!
//! ```text
//! SlotEngine (immutable GameConfig)
//!     │
//!     ├── GridBuilder       (strip / stop / weighted draws, giant symbols)
//!     ├── WinDetector       (PaylineDetector | AdjacencyDetector)
//!     ├── CascadeProcessor  (Evaluate → RemoveWins → ApplyGravity → Refill → Settle)
//!     ├── MeterController   (wild meter, scatters, respins, bonus wheel)
//!     └── Payout aggregate  (base → meter → free spin → bonus wheel)
//!           │
//!           v
//!     SpinResult + updated MeterState
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let engine = SlotEngine::new(presets::cascade_grid())?;
//! let mut rng = rng::seeded(42);
//! let mut meter = engine.new_meter();
//!
//! let result = engine.spin(1.0, meter.next_mode(), meter, &mut rng)?;
//! meter = result.meter.clone();
//! ```

pub mod bonus;
pub mod builder;
pub mod cascade;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod meter;
pub mod parser;
pub mod payout;
pub mod paytable;
pub mod presets;
pub mod rng;
pub mod spin;
pub mod symbols;
pub mod win;

pub use bonus::{BonusWheel, BonusWheelResult, MultiplierReel, ReelOutcome};
pub use builder::GridBuilder;
pub use cascade::{CascadeOutcome, CascadePhase, CascadeProcessor, CascadeRecord};
pub use config::*;
pub use engine::SlotEngine;
pub use error::*;
pub use grid::{GiantSymbolPlacement, Grid, Position};
pub use meter::{MeterController, MeterEvent, MeterRules, MeterState};
pub use parser::{ConfigLimits, ConfigParser};
pub use payout::{Multipliers, PayoutBreakdown};
pub use paytable::{PayTable, Payline, standard_20_paylines};
pub use spin::{SpinFlags, SpinMode, SpinResult};
pub use symbols::*;
pub use win::{AdjacencyDetector, PaylineDetector, WinDetector, WinGroup};
