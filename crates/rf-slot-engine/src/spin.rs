//! Spin modes and results

use serde::{Deserialize, Serialize};

use crate::bonus::ReelOutcome;
use crate::cascade::CascadeRecord;
use crate::grid::{GiantSymbolPlacement, Grid};
use crate::meter::{MeterEvent, MeterState};
use crate::payout::PayoutBreakdown;

/// Game mode of a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpinMode {
    #[default]
    Base,
    FreeSpin,
}

/// Flags raised during a spin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinFlags {
    /// Free spins added by this spin (0 if none)
    pub free_spins_awarded: u32,
    /// Bonus wheel is pending; the win waits for `spin_bonus_wheel`
    pub bonus_triggered: bool,
    /// This spin was a respin of the previous stake
    pub is_respin: bool,
    /// The next call should be a respin
    pub respin_awarded: bool,
    pub meter_triggered: bool,
    pub max_cascades_reached: bool,
}

/// Immutable outcome of one `spin()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub mode: SpinMode,
    pub stake: f64,
    /// False for free spins and respins
    pub stake_charged: bool,
    /// Grid as first built, giants stamped
    pub initial_grid: Grid,
    /// Settled grid
    pub grid: Grid,
    pub giants: Vec<GiantSymbolPlacement>,
    /// Evaluations that found wins, in order
    pub cascades: Vec<CascadeRecord>,
    pub events: Vec<MeterEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel_outcome: Option<ReelOutcome>,
    pub payout: PayoutBreakdown,
    /// Amount to credit for this spin
    pub total_payout: f64,
    /// Updated meter state to pass into the next call
    pub meter: MeterState,
    pub flags: SpinFlags,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.total_payout > 0.0
    }

    /// Total payout as a multiple of the stake
    pub fn win_ratio(&self) -> f64 {
        if self.stake > 0.0 {
            self.total_payout / self.stake
        } else {
            0.0
        }
    }

    pub fn cascade_count(&self) -> usize {
        self.cascades.len()
    }

    /// Win to hand to the bonus wheel, if one was triggered
    pub fn wheel_base_win(&self) -> Option<f64> {
        self.flags.bonus_triggered.then_some(self.payout.win)
    }
}
