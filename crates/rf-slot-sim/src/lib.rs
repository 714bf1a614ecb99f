//! rf-slot-sim: Batch RTP simulation
//!
//! Plays many independent sessions of a [`SlotEngine`] in parallel and
//! aggregates the outcome into [`SimulationStats`]. Every session owns its
//! meter state and a ChaCha8 source seeded from `seed + session index`, so a
//! run is reproducible regardless of how rayon schedules the sessions.

mod stats;

pub use stats::SimulationStats;

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rf_slot_engine::{SlotEngine, SpinError, rng};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Spin failed in session {session} at spin {spin}: {source}")]
    Spin {
        session: usize,
        spin: u64,
        #[source]
        source: SpinError,
    },

    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Engine calls per session, free spins and respins included
    pub spins_per_session: u64,
    pub sessions: usize,
    pub seed: u64,
    pub stake: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spins_per_session: 100_000,
            sessions: num_cpus::get(),
            seed: 0,
            stake: 1.0,
        }
    }
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub game_id: String,
    pub game_name: String,
    pub config: SimulationConfig,
    pub stats: SimulationStats,
    /// RTP of each session, in session order
    pub session_rtp: Vec<f64>,
    pub target_rtp: Option<f64>,
    pub elapsed_ms: u64,
}

impl SimulationReport {
    pub fn rtp(&self) -> f64 {
        self.stats.rtp()
    }

    /// Empirical minus target RTP
    pub fn rtp_deviation(&self) -> Option<f64> {
        self.target_rtp.map(|target| self.stats.rtp() - target)
    }

    /// Whether the empirical RTP lies within `tolerance` of the target.
    /// Games without a target always pass.
    pub fn within_target(&self, tolerance: f64) -> bool {
        self.rtp_deviation().is_none_or(|d| d.abs() <= tolerance)
    }

    pub fn spins_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.stats.total_spins as f64 / (self.elapsed_ms as f64 / 1000.0)
    }
}

pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        if config.sessions == 0 {
            return Err(SimError::InvalidConfig("sessions must be at least 1".into()));
        }
        if config.spins_per_session == 0 {
            return Err(SimError::InvalidConfig("spins per session must be at least 1".into()));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run every session and merge the results in session order
    pub fn run(&self, engine: &SlotEngine) -> SimResult<SimulationReport> {
        engine.validate_stake(self.config.stake).map_err(|source| SimError::Spin {
            session: 0,
            spin: 0,
            source,
        })?;

        let game = engine.config();
        info!(
            "Simulating '{}': {} sessions x {} spins at stake {}",
            game.id, self.config.sessions, self.config.spins_per_session, self.config.stake
        );

        let start = Instant::now();
        let sessions: Vec<SimulationStats> = (0..self.config.sessions)
            .into_par_iter()
            .map(|index| self.run_session(engine, index))
            .collect::<SimResult<_>>()?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let mut stats = SimulationStats::default();
        for session in &sessions {
            stats.merge(session);
        }
        info!(
            "Finished '{}' in {elapsed_ms} ms: RTP {:.4}, hit rate {:.4}",
            game.id,
            stats.rtp(),
            stats.hit_rate()
        );

        Ok(SimulationReport {
            game_id: game.id.clone(),
            game_name: game.name.clone(),
            config: self.config.clone(),
            session_rtp: sessions.iter().map(SimulationStats::rtp).collect(),
            stats,
            target_rtp: game.target_rtp,
            elapsed_ms,
        })
    }

    /// Play one isolated session
    pub fn run_session(&self, engine: &SlotEngine, index: usize) -> SimResult<SimulationStats> {
        let mut rng = rng::seeded(self.config.seed.wrapping_add(index as u64));
        let mut meter = engine.new_meter();
        let mut stats = SimulationStats::default();

        for spin in 0..self.config.spins_per_session {
            let fail = |source| SimError::Spin {
                session: index,
                spin,
                source,
            };

            let result = engine
                .spin(self.config.stake, meter.next_mode(), meter, &mut rng)
                .map_err(fail)?;
            meter = result.meter.clone();

            let wheel = if meter.take_bonus_wheel() {
                let base_win = result.wheel_base_win().unwrap_or(0.0);
                Some(engine.spin_bonus_wheel(base_win, &mut rng).map_err(fail)?)
            } else {
                None
            };
            stats.record(&result, wheel.as_ref());
        }

        debug!(
            "Session {index}: {} spins, RTP {:.4}",
            stats.total_spins,
            stats.rtp()
        );
        Ok(stats)
    }
}
