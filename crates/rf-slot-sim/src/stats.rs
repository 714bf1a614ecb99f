//! Aggregated simulation statistics

use serde::{Deserialize, Serialize};

use rf_slot_engine::{BonusWheelResult, SpinMode, SpinResult};

/// Counters collected over one or more sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub total_spins: u64,
    /// Spins that debited the stake
    pub paid_spins: u64,
    pub free_spins: u64,
    pub respins: u64,
    pub total_staked: f64,
    pub total_returned: f64,
    pub winning_spins: u64,
    pub max_win_ratio: f64,
    /// Spins with two or more winning cascades
    pub cascade_chains: u64,
    pub deepest_cascade: u32,
    pub cascade_limit_hits: u64,
    pub meter_triggers: u64,
    pub free_spin_triggers: u64,
    pub free_spins_awarded: u64,
    pub respins_awarded: u64,
    pub bonus_wheels: u64,
    pub bonus_wheel_returned: f64,
}

impl SimulationStats {
    /// Record one engine spin and, if it fired, the wheel that resolved it
    pub fn record(&mut self, result: &SpinResult, wheel: Option<&BonusWheelResult>) {
        self.total_spins += 1;
        if result.stake_charged {
            self.paid_spins += 1;
            self.total_staked += result.stake;
        }
        if result.flags.is_respin {
            self.respins += 1;
        } else if result.mode == SpinMode::FreeSpin {
            self.free_spins += 1;
        }

        let mut returned = result.total_payout;
        if let Some(wheel) = wheel {
            self.bonus_wheels += 1;
            self.bonus_wheel_returned += wheel.final_win;
            returned += wheel.final_win;
        }
        self.total_returned += returned;

        if returned > 0.0 {
            self.winning_spins += 1;
            if result.stake > 0.0 {
                self.max_win_ratio = self.max_win_ratio.max(returned / result.stake);
            }
        }

        let depth = result.cascade_count() as u32;
        if depth >= 2 {
            self.cascade_chains += 1;
        }
        self.deepest_cascade = self.deepest_cascade.max(depth);
        if result.flags.max_cascades_reached {
            self.cascade_limit_hits += 1;
        }

        if result.flags.meter_triggered {
            self.meter_triggers += 1;
        }
        if result.flags.free_spins_awarded > 0 {
            self.free_spin_triggers += 1;
            self.free_spins_awarded += result.flags.free_spins_awarded as u64;
        }
        if result.flags.respin_awarded {
            self.respins_awarded += 1;
        }
    }

    /// Return to player as a fraction of total stake
    pub fn rtp(&self) -> f64 {
        if self.total_staked > 0.0 {
            self.total_returned / self.total_staked
        } else {
            0.0
        }
    }

    /// Fraction of spins that returned anything
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            self.winning_spins as f64 / self.total_spins as f64
        } else {
            0.0
        }
    }

    /// Share of the return paid out by bonus wheels
    pub fn bonus_share(&self) -> f64 {
        if self.total_returned > 0.0 {
            self.bonus_wheel_returned / self.total_returned
        } else {
            0.0
        }
    }

    pub fn merge(&mut self, other: &SimulationStats) {
        self.total_spins += other.total_spins;
        self.paid_spins += other.paid_spins;
        self.free_spins += other.free_spins;
        self.respins += other.respins;
        self.total_staked += other.total_staked;
        self.total_returned += other.total_returned;
        self.winning_spins += other.winning_spins;
        self.max_win_ratio = self.max_win_ratio.max(other.max_win_ratio);
        self.cascade_chains += other.cascade_chains;
        self.deepest_cascade = self.deepest_cascade.max(other.deepest_cascade);
        self.cascade_limit_hits += other.cascade_limit_hits;
        self.meter_triggers += other.meter_triggers;
        self.free_spin_triggers += other.free_spin_triggers;
        self.free_spins_awarded += other.free_spins_awarded;
        self.respins_awarded += other.respins_awarded;
        self.bonus_wheels += other.bonus_wheels;
        self.bonus_wheel_returned += other.bonus_wheel_returned;
    }
}
