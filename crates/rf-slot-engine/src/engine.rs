//! Slot engine
//!
//! [`SlotEngine`] owns a validated, immutable [`GameConfig`] and the draw
//! tables derived from it. Per-session state ([`MeterState`] and the random
//! source) is passed into every call, so one engine can serve any number of
//! sessions across threads.

use log::debug;
use rand::prelude::*;

use crate::bonus::{BonusWheel, BonusWheelResult, MultiplierReel, ReelOutcome};
use crate::builder::GridBuilder;
use crate::cascade::CascadeProcessor;
use crate::config::GameConfig;
use crate::error::{ConfigResult, SpinError};
use crate::meter::{MeterController, MeterRules, MeterState};
use crate::parser::ConfigParser;
use crate::payout::{self, Multipliers};
use crate::paytable::PayTable;
use crate::spin::{SpinFlags, SpinMode, SpinResult};
use crate::symbols::SymbolSet;
use crate::win::{WinDetector, detector_for};

/// Configured slot engine
#[derive(Debug)]
pub struct SlotEngine {
    config: GameConfig,
    paytable: PayTable,
    detector: Box<dyn WinDetector>,
    builder: GridBuilder,
    meter_rules: MeterRules,
    multiplier_reel: Option<MultiplierReel>,
    bonus_wheel: Option<BonusWheel>,
}

impl SlotEngine {
    /// Validate a config and build the engine
    pub fn new(config: GameConfig) -> ConfigResult<Self> {
        config.validate()?;
        let symbols = SymbolSet::new(config.symbols.clone())?;
        let builder = GridBuilder::from_config(&config, &symbols)?;
        let multiplier_reel = MultiplierReel::from_config(&config)?;
        let bonus_wheel = BonusWheel::from_config(&config)?;

        debug!(
            "Engine '{}' ready: {}×{} {:?}, draw {:?}, cascades {}",
            config.id,
            config.reels,
            config.rows,
            config.win_mode,
            config.draw_mode,
            config.cascades_enabled
        );

        Ok(Self {
            paytable: PayTable::new(symbols, config.min_match_length),
            detector: detector_for(&config),
            meter_rules: MeterRules::from_config(&config),
            builder,
            multiplier_reel,
            bonus_wheel,
            config,
        })
    }

    /// Load a JSON config with default limits
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Self::new(ConfigParser::new().parse_json(json)?)
    }

    /// Load a YAML config with default limits
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Self::new(ConfigParser::new().parse_yaml(yaml)?)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn detector(&self) -> &dyn WinDetector {
        self.detector.as_ref()
    }

    /// Fresh meter state for a new session
    pub fn new_meter(&self) -> MeterState {
        MeterState {
            threshold: self.config.wild_meter_threshold,
            ..MeterState::default()
        }
    }

    pub fn validate_stake(&self, stake: f64) -> Result<(), SpinError> {
        let limits = self.config.stake;
        if limits.contains(stake) {
            Ok(())
        } else {
            Err(SpinError::InvalidStake {
                stake,
                min: limits.min,
                max: limits.max,
            })
        }
    }

    /// Play one spin sequence to completion.
    ///
    /// Rejections happen before any draw and leave `meter` with the caller
    /// unchanged.
    pub fn spin<R: Rng + ?Sized>(
        &self,
        stake: f64,
        mode: SpinMode,
        mut meter: MeterState,
        rng: &mut R,
    ) -> Result<SpinResult, SpinError> {
        self.validate_stake(stake)?;
        let is_respin = meter.respin_pending;
        if is_respin {
            match meter.respin_mode {
                Some(expected) if expected != mode => {
                    return Err(SpinError::RespinModeMismatch {
                        expected,
                        requested: mode,
                    });
                }
                _ => {}
            }
        } else if mode == SpinMode::FreeSpin && meter.free_spins_remaining == 0 {
            return Err(SpinError::NoFreeSpinsRemaining);
        }

        if !is_respin {
            match mode {
                SpinMode::Base => meter.reset_sequence(),
                SpinMode::FreeSpin => meter.free_spins_remaining -= 1,
            }
            meter.respin_count = 0;
        }
        meter.respin_pending = false;
        meter.respin_mode = None;
        meter.scatter_count = 0;

        let mut controller = MeterController::new(&self.meter_rules, meter);

        let (initial_grid, giants) = self.builder.build(mode, rng);
        let processor = CascadeProcessor {
            detector: self.detector.as_ref(),
            paytable: &self.paytable,
            builder: &self.builder,
            max_cascades: self.config.max_cascades,
            enabled: self.config.cascades_enabled,
        };
        let outcome = processor.run(initial_grid.clone(), &giants, mode, &mut controller, rng);

        let reel_outcome = self.multiplier_reel.as_ref().map(|reel| match reel.draw(rng) {
            ReelOutcome::Respin { symbol, .. } => ReelOutcome::Respin {
                symbol,
                granted: controller.grant_respin(mode),
            },
            ReelOutcome::BonusWheel { symbol } => {
                controller.trigger_bonus_wheel();
                ReelOutcome::BonusWheel { symbol }
            }
            multiplier => multiplier,
        });
        let bonus_triggered = matches!(reel_outcome, Some(ReelOutcome::BonusWheel { .. }));

        let multipliers = Multipliers {
            reel: reel_outcome.as_ref().map(ReelOutcome::multiplier).unwrap_or(1.0),
            meter: controller.state().active_multiplier,
            free_spin: match mode {
                SpinMode::Base => 1.0,
                SpinMode::FreeSpin => self.config.free_spin_multiplier,
            },
        };
        let payout = payout::aggregate(
            &outcome.cascades,
            self.config.payout_unit(stake),
            multipliers,
            bonus_triggered,
        );

        let flags = SpinFlags {
            free_spins_awarded: controller.free_spins_awarded(),
            bonus_triggered,
            is_respin,
            respin_awarded: controller.state().respin_pending,
            meter_triggered: controller.meter_triggered(),
            max_cascades_reached: outcome.max_cascades_reached,
        };
        let (meter, events) = controller.finish();

        let total_payout = payout.paid();
        debug!(
            "Spin {:?} stake {stake}: {} cascades, payout {total_payout}, {} events",
            mode,
            outcome.cascades.len(),
            events.len()
        );

        Ok(SpinResult {
            mode,
            stake,
            stake_charged: mode == SpinMode::Base && !is_respin,
            initial_grid,
            grid: outcome.grid,
            giants,
            cascades: outcome.cascades,
            events,
            reel_outcome,
            payout,
            total_payout,
            meter,
            flags,
        })
    }

    /// Resolve a pending bonus wheel against the suspended base win
    pub fn spin_bonus_wheel<R: Rng + ?Sized>(
        &self,
        base_win: f64,
        rng: &mut R,
    ) -> Result<BonusWheelResult, SpinError> {
        let wheel = self.bonus_wheel.as_ref().ok_or(SpinError::BonusWheelUnavailable)?;
        if !base_win.is_finite() || base_win < 0.0 {
            return Err(SpinError::InvalidBaseWin(base_win));
        }
        let result = wheel.spin(base_win, rng);
        debug!(
            "Bonus wheel: segment {} ({}) x{} → {}",
            result.segment, result.label, result.multiplier, result.final_win
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::rng::seeded;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_sync() {
        assert_send_sync::<SlotEngine>();
    }

    #[test]
    fn test_invalid_stake_rejected_before_draw() {
        let engine = SlotEngine::new(presets::line_slot()).unwrap();
        let mut rng = seeded(1);
        let before = rng.clone();

        let err = engine.spin(0.0, SpinMode::Base, engine.new_meter(), &mut rng).unwrap_err();
        assert!(matches!(err, SpinError::InvalidStake { .. }));
        assert_eq!(rng, before);

        let err = engine.spin(1_000.0, SpinMode::Base, engine.new_meter(), &mut rng).unwrap_err();
        assert!(matches!(err, SpinError::InvalidStake { max, .. } if max == 200.0));
    }

    #[test]
    fn test_free_spin_without_allotment_rejected() {
        let engine = SlotEngine::new(presets::cascade_grid()).unwrap();
        let err = engine
            .spin(1.0, SpinMode::FreeSpin, engine.new_meter(), &mut seeded(1))
            .unwrap_err();
        assert_eq!(err, SpinError::NoFreeSpinsRemaining);
    }

    #[test]
    fn test_seeded_spins_repeat() {
        for config in presets::all_presets() {
            let engine = SlotEngine::new(config).unwrap();
            let a = engine.spin(1.0, SpinMode::Base, engine.new_meter(), &mut seeded(77)).unwrap();
            let b = engine.spin(1.0, SpinMode::Base, engine.new_meter(), &mut seeded(77)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_free_spin_decrements_allotment() {
        let engine = SlotEngine::new(presets::line_slot()).unwrap();
        let mut meter = engine.new_meter();
        meter.free_spins_remaining = 3;

        let result = engine.spin(1.0, SpinMode::FreeSpin, meter, &mut seeded(3)).unwrap();
        assert!(!result.stake_charged);
        assert_eq!(
            result.meter.free_spins_remaining,
            2 + result.flags.free_spins_awarded
        );
        assert_eq!(result.payout.free_spin_multiplier, 2.0);
    }

    #[test]
    fn test_bonus_wheel_errors() {
        let engine = SlotEngine::new(presets::line_slot()).unwrap();
        assert_eq!(
            engine.spin_bonus_wheel(1.0, &mut seeded(1)).unwrap_err(),
            SpinError::BonusWheelUnavailable
        );

        let engine = SlotEngine::new(presets::multiplier_reel()).unwrap();
        assert_eq!(
            engine.spin_bonus_wheel(-1.0, &mut seeded(1)).unwrap_err(),
            SpinError::InvalidBaseWin(-1.0)
        );
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = presets::cascade_grid();
        config.reel_strips.base_game.clear();
        assert!(SlotEngine::new(config).is_err());
    }
}
