//! Meter & bonus state
//!
//! [`MeterState`] is owned by the caller and passed through every spin. The
//! [`MeterController`] applies one spin's worth of meter, scatter and respin
//! updates to it and records each trigger as a [`MeterEvent`].

use std::collections::BTreeMap;

use log::info;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::grid::{Grid, Position};
use crate::paytable::PayTable;
use crate::spin::SpinMode;

/// Per-session meter and bonus state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterState {
    pub wild_meter: u32,
    /// Read-only mirror of the configured wild meter threshold. The
    /// controller overwrites it from the game rules on every spin.
    pub threshold: Option<u32>,
    /// Peak scatter count of the latest spin
    pub scatter_count: u32,
    pub free_spins_remaining: u32,
    /// Compounded wild meter multiplier for the current sequence
    pub active_multiplier: f64,
    /// Consecutive respins granted so far
    pub respin_count: u32,
    /// Next call is a respin of the same stake
    pub respin_pending: bool,
    /// Mode of the spin that granted the pending respin
    #[serde(default)]
    pub respin_mode: Option<SpinMode>,
    pub bonus_wheel_pending: bool,
}

impl Default for MeterState {
    fn default() -> Self {
        Self {
            wild_meter: 0,
            threshold: None,
            scatter_count: 0,
            free_spins_remaining: 0,
            active_multiplier: 1.0,
            respin_count: 0,
            respin_pending: false,
            respin_mode: None,
            bonus_wheel_pending: false,
        }
    }
}

impl MeterState {
    pub fn in_free_spins(&self) -> bool {
        self.free_spins_remaining > 0
    }

    /// Mode the next spin should be played in. A pending respin replays the
    /// mode that granted it.
    pub fn next_mode(&self) -> SpinMode {
        if self.respin_pending {
            if let Some(mode) = self.respin_mode {
                return mode;
            }
        }
        if self.in_free_spins() {
            SpinMode::FreeSpin
        } else {
            SpinMode::Base
        }
    }

    /// Consume the pending bonus wheel flag
    pub fn take_bonus_wheel(&mut self) -> bool {
        std::mem::take(&mut self.bonus_wheel_pending)
    }

    /// Start a new base game sequence
    pub fn reset_sequence(&mut self) {
        *self = Self {
            threshold: self.threshold,
            free_spins_remaining: self.free_spins_remaining,
            ..Self::default()
        };
    }
}

/// A side-effecting trigger raised during a spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MeterEvent {
    /// Wild meter reached its threshold
    MultiplierTriggered {
        cascade: u32,
        multiplier: f64,
        /// Active multiplier after stacking
        total: f64,
    },
    FreeSpinsAwarded { cascade: u32, scatters: u32, spins: u32 },
    RespinAwarded { count: u32 },
    BonusWheelTriggered,
}

/// Meter rules taken from the config
#[derive(Debug, Clone)]
pub struct MeterRules {
    pub threshold: Option<u32>,
    pub multipliers: Vec<f64>,
    pub max_multiplier: Option<f64>,
    pub free_spin_table: BTreeMap<u32, u32>,
    pub max_consecutive_respins: u32,
}

impl MeterRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            threshold: config.wild_meter_threshold,
            multipliers: config.wild_meter_multipliers.clone(),
            max_multiplier: config.max_meter_multiplier,
            free_spin_table: config.scatter_free_spin_table.clone(),
            max_consecutive_respins: config.max_consecutive_respins,
        }
    }

    /// Free spins for a scatter count (largest table key not above it)
    pub fn free_spins_for(&self, scatters: u32) -> u32 {
        self.free_spin_table
            .range(..=scatters)
            .next_back()
            .map(|(_, &spins)| spins)
            .unwrap_or(0)
    }
}

/// Applies one spin's meter updates to a [`MeterState`]
#[derive(Debug)]
pub struct MeterController<'a> {
    rules: &'a MeterRules,
    state: MeterState,
    events: Vec<MeterEvent>,
    /// Free spins already awarded this spin
    awarded: u32,
}

impl<'a> MeterController<'a> {
    pub fn new(rules: &'a MeterRules, mut state: MeterState) -> Self {
        state.threshold = rules.threshold;
        Self {
            rules,
            state,
            events: Vec::new(),
            awarded: 0,
        }
    }

    pub fn state(&self) -> &MeterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MeterState {
        &mut self.state
    }

    /// Update meters for one cascade: `landed` are the cells drawn into the
    /// grid since the previous observation.
    pub fn observe<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        landed: &[Position],
        cascade: u32,
        paytable: &PayTable,
        rng: &mut R,
    ) {
        if let Some(threshold) = self.rules.threshold {
            let eligible = landed
                .iter()
                .filter(|&&(reel, row)| {
                    grid.get(reel, row).is_some_and(|id| paytable.counts_for_meter(id))
                })
                .count() as u32;
            self.state.wild_meter += eligible;
            if eligible > 0 && self.state.wild_meter >= threshold {
                self.trigger_multiplier(cascade, rng);
            }
        }

        let scatters = grid.count(|id| paytable.is_scatter(id)) as u32;
        self.state.scatter_count = self.state.scatter_count.max(scatters);
        let due = self.rules.free_spins_for(self.state.scatter_count);
        if due > self.awarded {
            let spins = due - self.awarded;
            self.awarded = due;
            self.state.free_spins_remaining += spins;
            info!(
                "Free spins awarded: {spins} for {} scatters (cascade {cascade}, {} remaining)",
                self.state.scatter_count, self.state.free_spins_remaining
            );
            self.events.push(MeterEvent::FreeSpinsAwarded {
                cascade,
                scatters: self.state.scatter_count,
                spins,
            });
        }
    }

    fn trigger_multiplier<R: Rng + ?Sized>(&mut self, cascade: u32, rng: &mut R) {
        // Overflow past the threshold is discarded
        self.state.wild_meter = 0;
        let Some(&multiplier) = self.rules.multipliers.choose(rng) else {
            return;
        };
        let stacked = self.state.active_multiplier * multiplier;
        self.state.active_multiplier = match self.rules.max_multiplier {
            Some(cap) => stacked.min(cap),
            None => stacked,
        };
        info!(
            "Wild meter triggered at cascade {cascade}: x{multiplier} (active x{})",
            self.state.active_multiplier
        );
        self.events.push(MeterEvent::MultiplierTriggered {
            cascade,
            multiplier,
            total: self.state.active_multiplier,
        });
    }

    /// Grant a respin of a `mode` spin if the consecutive limit allows it
    pub fn grant_respin(&mut self, mode: SpinMode) -> bool {
        if self.state.respin_count >= self.rules.max_consecutive_respins {
            return false;
        }
        self.state.respin_count += 1;
        self.state.respin_pending = true;
        self.state.respin_mode = Some(mode);
        info!(
            "Respin awarded ({}/{})",
            self.state.respin_count, self.rules.max_consecutive_respins
        );
        self.events.push(MeterEvent::RespinAwarded {
            count: self.state.respin_count,
        });
        true
    }

    pub fn trigger_bonus_wheel(&mut self) {
        self.state.bonus_wheel_pending = true;
        info!("Bonus wheel triggered");
        self.events.push(MeterEvent::BonusWheelTriggered);
    }

    pub fn free_spins_awarded(&self) -> u32 {
        self.awarded
    }

    pub fn meter_triggered(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, MeterEvent::MultiplierTriggered { .. }))
    }

    pub fn finish(self) -> (MeterState, Vec<MeterEvent>) {
        (self.state, self.events)
    }
}
