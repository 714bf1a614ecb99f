//! Payout Aggregator

use serde::{Deserialize, Serialize};

use crate::cascade::CascadeRecord;

/// Multipliers in effect for one spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    /// Multiplier reel stop
    pub reel: f64,
    /// Active wild meter multiplier
    pub meter: f64,
    /// Free spin multiplier (1 in the base game)
    pub free_spin: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            reel: 1.0,
            meter: 1.0,
            free_spin: 1.0,
        }
    }
}

/// Payout breakdown of one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutBreakdown {
    /// Sum of paytable multipliers over every group of every cascade
    pub base_pays: f64,
    /// Stake divided by the bet divisor
    pub unit: f64,
    /// `base_pays × unit × reel multiplier`
    pub base_win: f64,
    pub reel_multiplier: f64,
    pub meter_multiplier: f64,
    pub free_spin_multiplier: f64,
    /// Win after meter and free spin multipliers
    pub win: f64,
    /// Win handed to the bonus wheel instead of being paid
    pub suspended: bool,
}

impl PayoutBreakdown {
    /// Amount paid by this spin
    pub fn paid(&self) -> f64 {
        if self.suspended { 0.0 } else { self.win }
    }
}

/// Sum cascade pays and apply multipliers: base → meter → free spin
pub fn aggregate(
    cascades: &[CascadeRecord],
    unit: f64,
    multipliers: Multipliers,
    suspended: bool,
) -> PayoutBreakdown {
    let base_pays: f64 = cascades.iter().map(|c| c.pays).sum();
    let base_win = base_pays * unit * multipliers.reel;
    let win = if base_pays > 0.0 {
        base_win * multipliers.meter * multipliers.free_spin
    } else {
        0.0
    };

    PayoutBreakdown {
        base_pays,
        unit,
        base_win,
        reel_multiplier: multipliers.reel,
        meter_multiplier: multipliers.meter,
        free_spin_multiplier: multipliers.free_spin,
        win: win.max(0.0),
        suspended,
    }
}
