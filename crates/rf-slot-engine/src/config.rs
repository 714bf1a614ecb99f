//! Game configuration
//!
//! One [`GameConfig`] describes a complete game: grid, symbols, reel strips,
//! win rules and bonus parameters. Keys follow the camelCase data-file schema.
//! A config is checked once by [`GameConfig::validate`] and is immutable from
//! then on.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::paytable::{Payline, standard_20_paylines};
use crate::spin::SpinMode;
use crate::symbols::{ReelStrip, Symbol, SymbolCategory, SymbolId, SymbolSet};

/// How wins are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinMode {
    /// Fixed paylines, evaluated from the leftmost reel
    #[default]
    Paylines,
    /// Runs of adjacent matching symbols on any row, from any reel
    Adjacency,
}

/// How grid cells are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// Uniform index into the reel strip, independently per cell
    #[default]
    Strip,
    /// One random stop per reel, contiguous window of `rows` symbols
    Stop,
    /// Cumulative selection over symbol weights
    Weighted,
}

/// Reel strips per game mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelStripSet {
    #[serde(default)]
    pub base_game: Vec<ReelStrip>,
    /// Empty means free spins reuse the base strips
    #[serde(default)]
    pub free_spins: Vec<ReelStrip>,
}

impl ReelStripSet {
    /// Strips used in a mode
    pub fn for_mode(&self, mode: SpinMode) -> &[ReelStrip] {
        match mode {
            SpinMode::FreeSpin if !self.free_spins.is_empty() => &self.free_spins,
            _ => &self.base_game,
        }
    }
}

/// Allowed stake range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeLimits {
    pub min: f64,
    pub max: f64,
}

impl StakeLimits {
    pub fn contains(&self, stake: f64) -> bool {
        stake.is_finite() && stake >= self.min && stake <= self.max
    }
}

impl Default for StakeLimits {
    fn default() -> Self {
        Self { min: 0.1, max: 100.0 }
    }
}

/// Giant (multi-cell) symbol placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiantConfig {
    #[serde(default = "default_giant_size")]
    pub width: u8,
    #[serde(default = "default_giant_size")]
    pub height: u8,
    /// Chance per window scan step in the base game
    #[serde(default)]
    pub base_probability: f64,
    /// Chance per window scan step during free spins
    #[serde(default)]
    pub free_spin_probability: f64,
}

fn default_giant_size() -> u8 {
    2
}

impl GiantConfig {
    pub fn probability(&self, mode: SpinMode) -> f64 {
        match mode {
            SpinMode::Base => self.base_probability,
            SpinMode::FreeSpin => self.free_spin_probability,
        }
    }
}

/// One stop on the multiplier reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierReelEntry {
    pub symbol: SymbolId,
    pub weight: f64,
    /// Win multiplier; ignored for respin and bonus wheel symbols
    #[serde(default)]
    pub multiplier: Option<f64>,
}

/// Secondary reel drawn once after the main grid settles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierReelConfig {
    pub entries: Vec<MultiplierReelEntry>,
}

/// One bonus wheel segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelSegment {
    #[serde(default)]
    pub label: String,
    pub weight: f64,
    pub multiplier: f64,
}

/// Weighted bonus wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusWheelConfig {
    /// Multiplier reel symbol that hands off to the wheel
    #[serde(default)]
    pub trigger_symbol: Option<SymbolId>,
    pub segments: Vec<WheelSegment>,
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub id: String,
    pub name: String,
    /// Documented RTP (informational, compared by the simulator)
    #[serde(default)]
    pub target_rtp: Option<f64>,

    pub reels: u8,
    pub rows: u8,
    /// Minimum run length for a payline or adjacency win
    pub min_match_length: u8,
    #[serde(default)]
    pub win_mode: WinMode,
    #[serde(default)]
    pub draw_mode: DrawMode,

    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub reel_strips: ReelStripSet,
    /// Row index per reel; absent on a 5×3 payline game means the standard 20 lines
    #[serde(default)]
    pub paylines: Option<Vec<Vec<u8>>>,

    #[serde(default)]
    pub wild_meter_threshold: Option<u32>,
    #[serde(default)]
    pub wild_meter_multipliers: Vec<f64>,
    /// Cap for the compounded meter multiplier
    #[serde(default)]
    pub max_meter_multiplier: Option<f64>,

    /// Scatter count → free spins awarded
    #[serde(default)]
    pub scatter_free_spin_table: BTreeMap<u32, u32>,
    #[serde(default = "default_multiplier")]
    pub free_spin_multiplier: f64,

    #[serde(default = "default_max_cascades")]
    pub max_cascades: u32,
    #[serde(default = "default_true")]
    pub cascades_enabled: bool,

    #[serde(default)]
    pub giant_symbols: Option<GiantConfig>,
    #[serde(default)]
    pub multiplier_reel: Option<MultiplierReelConfig>,
    #[serde(default)]
    pub bonus_wheel: Option<BonusWheelConfig>,
    #[serde(default)]
    pub respin_symbol: Option<SymbolId>,
    #[serde(default)]
    pub max_consecutive_respins: u32,

    #[serde(default)]
    pub stake: StakeLimits,
    /// Stake is divided by this to get the pay unit
    #[serde(default)]
    pub bet_divisor: Option<f64>,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_max_cascades() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

impl GameConfig {
    /// Paylines in effect for payline mode
    pub fn resolved_paylines(&self) -> Vec<Payline> {
        match &self.paylines {
            Some(lines) => lines
                .iter()
                .enumerate()
                .map(|(index, rows)| Payline {
                    index: index as u8,
                    positions: rows.clone(),
                })
                .collect(),
            None if self.reels == 5 && self.rows == 3 => standard_20_paylines(),
            None => Vec::new(),
        }
    }

    /// Divisor applied to the stake: payline count in payline mode, 1 otherwise
    pub fn bet_divisor(&self) -> f64 {
        match (self.bet_divisor, self.win_mode) {
            (Some(divisor), _) => divisor,
            (None, WinMode::Paylines) => self.resolved_paylines().len().max(1) as f64,
            (None, WinMode::Adjacency) => 1.0,
        }
    }

    /// Stake-derived pay unit
    pub fn payout_unit(&self, stake: f64) -> f64 {
        stake / self.bet_divisor()
    }

    /// Check every invariant; the engine refuses to build on failure
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_grid()?;
        let symbols = SymbolSet::new(self.symbols.clone())?;
        self.validate_symbols()?;
        self.validate_draws(&symbols)?;
        if self.win_mode == WinMode::Paylines {
            self.validate_paylines()?;
        }
        self.validate_meter()?;
        self.validate_giants()?;
        self.validate_bonus(&symbols)?;

        if !(self.stake.min.is_finite() && self.stake.max.is_finite())
            || self.stake.min <= 0.0
            || self.stake.min > self.stake.max
        {
            return Err(ConfigError::InvalidStakeRange {
                min: self.stake.min,
                max: self.stake.max,
            });
        }
        if let Some(divisor) = self.bet_divisor {
            if !divisor.is_finite() || divisor <= 0.0 {
                return Err(ConfigError::InvalidValue(format!("betDivisor {divisor}")));
            }
        }
        Ok(())
    }

    fn validate_grid(&self) -> ConfigResult<()> {
        if self.reels == 0 || self.rows == 0 {
            return Err(ConfigError::InvalidGrid {
                reels: self.reels,
                rows: self.rows,
            });
        }
        if self.min_match_length == 0 || self.min_match_length > self.reels {
            return Err(ConfigError::InvalidMatchLength {
                min: self.min_match_length,
                reels: self.reels,
            });
        }
        if self.max_cascades == 0 {
            return Err(ConfigError::InvalidValue("maxCascades must be at least 1".into()));
        }
        Ok(())
    }

    fn validate_symbols(&self) -> ConfigResult<()> {
        for symbol in &self.symbols {
            for weight in std::iter::once(symbol.weight).chain(symbol.free_spin_weight) {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ConfigError::InvalidWeight {
                        symbol: symbol.id,
                        weight,
                    });
                }
            }
            for (&count, &pay) in &symbol.pays {
                if count < self.min_match_length {
                    return Err(ConfigError::PayoutBelowMinimum {
                        symbol: symbol.id,
                        count,
                        min: self.min_match_length,
                    });
                }
                if !pay.is_finite() || pay < 0.0 {
                    return Err(ConfigError::InvalidPayout {
                        symbol: symbol.id,
                        count,
                        pay,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_draws(&self, symbols: &SymbolSet) -> ConfigResult<()> {
        match self.draw_mode {
            DrawMode::Strip | DrawMode::Stop => {
                self.validate_strips(SpinMode::Base, &self.reel_strips.base_game, symbols)?;
                if !self.reel_strips.free_spins.is_empty() {
                    let free = &self.reel_strips.free_spins;
                    self.validate_strips(SpinMode::FreeSpin, free, symbols)?;
                }
            }
            DrawMode::Weighted => {
                for (mode, free) in [(SpinMode::Base, false), (SpinMode::FreeSpin, true)] {
                    let total: f64 = self.symbols.iter().map(|s| s.weight_for(free)).sum();
                    if total <= 0.0 {
                        let table = format!("symbol weights ({mode:?})");
                        return Err(ConfigError::ZeroWeightSum(table));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_strips(
        &self,
        mode: SpinMode,
        strips: &[ReelStrip],
        symbols: &SymbolSet,
    ) -> ConfigResult<()> {
        if strips.len() != self.reels as usize {
            return Err(ConfigError::ReelCountMismatch {
                mode,
                expected: self.reels,
                found: strips.len(),
            });
        }
        for (reel, strip) in strips.iter().enumerate() {
            if strip.is_empty() {
                return Err(ConfigError::EmptyReelStrip { mode, reel: reel as u8 });
            }
            for &id in &strip.symbols {
                symbols.require(id, &format!("{mode:?} reel strip {reel}"))?;
            }
        }
        Ok(())
    }

    fn validate_paylines(&self) -> ConfigResult<()> {
        let lines = self.resolved_paylines();
        if lines.is_empty() {
            return Err(ConfigError::MalformedPayline {
                index: 0,
                reason: format!("no paylines configured for a {}×{} grid", self.reels, self.rows),
            });
        }
        for (index, line) in lines.iter().enumerate() {
            if line.positions.len() != self.reels as usize {
                return Err(ConfigError::MalformedPayline {
                    index,
                    reason: format!("{} positions for {} reels", line.positions.len(), self.reels),
                });
            }
            if let Some(&row) = line.positions.iter().find(|&&row| row >= self.rows) {
                return Err(ConfigError::MalformedPayline {
                    index,
                    reason: format!("row {row} outside {} rows", self.rows),
                });
            }
        }
        Ok(())
    }

    fn validate_meter(&self) -> ConfigResult<()> {
        if let Some(threshold) = self.wild_meter_threshold {
            if threshold == 0 {
                return Err(ConfigError::InvalidValue("wildMeterThreshold must be positive".into()));
            }
            if self.wild_meter_multipliers.is_empty() {
                return Err(ConfigError::MissingMeterMultipliers);
            }
        }
        for &value in &self.wild_meter_multipliers {
            check_multiplier("wildMeterMultipliers", value, false)?;
        }
        if let Some(cap) = self.max_meter_multiplier {
            if !cap.is_finite() || cap < 1.0 {
                return Err(ConfigError::InvalidMultiplier {
                    context: "maxMeterMultiplier".into(),
                    value: cap,
                });
            }
        }
        if self.scatter_free_spin_table.contains_key(&0) {
            return Err(ConfigError::InvalidValue(
                "scatterFreeSpinTable counts must be positive".into(),
            ));
        }
        check_multiplier("freeSpinMultiplier", self.free_spin_multiplier, false)
    }

    fn validate_giants(&self) -> ConfigResult<()> {
        let Some(giant) = &self.giant_symbols else {
            return Ok(());
        };
        if giant.width == 0
            || giant.height == 0
            || giant.width > self.reels
            || giant.height > self.rows
        {
            return Err(ConfigError::GiantOutOfBounds {
                width: giant.width,
                height: giant.height,
                reels: self.reels,
                rows: self.rows,
            });
        }
        if giant.width >= self.min_match_length {
            return Err(ConfigError::GiantWiderThanMatch {
                width: giant.width,
                min: self.min_match_length,
            });
        }
        for (name, value) in [
            ("giantSymbols.baseProbability", giant.base_probability),
            ("giantSymbols.freeSpinProbability", giant.free_spin_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability {
                    name: name.into(),
                    value,
                });
            }
        }
        let eligible: Vec<&Symbol> = self.symbols.iter().filter(|s| s.giant).collect();
        if eligible.is_empty() {
            return Err(ConfigError::NoGiantSymbols);
        }
        if let Some(bad) = eligible.iter().find(|s| !s.category.is_substitutable()) {
            return Err(ConfigError::InvalidValue(format!(
                "symbol {} ({:?}) cannot be a giant symbol",
                bad.id, bad.category
            )));
        }
        Ok(())
    }

    fn validate_bonus(&self, symbols: &SymbolSet) -> ConfigResult<()> {
        if let Some(reel) = &self.multiplier_reel {
            if reel.entries.is_empty() {
                return Err(ConfigError::ZeroWeightSum("multiplierReel".into()));
            }
            for entry in &reel.entries {
                symbols.require(entry.symbol, "multiplierReel")?;
                if let Some(value) = entry.multiplier {
                    check_multiplier("multiplierReel", value, false)?;
                }
            }
        }

        let wheel_symbol = self.bonus_wheel.as_ref().and_then(|w| w.trigger_symbol);
        if let Some(wheel) = &self.bonus_wheel {
            for segment in &wheel.segments {
                check_multiplier("bonusWheel", segment.multiplier, true)?;
            }
            if let Some(id) = wheel.trigger_symbol {
                symbols.require(id, "bonusWheel.triggerSymbol")?;
            }
        }
        if let Some(id) = self.respin_symbol {
            symbols.require(id, "respinSymbol")?;
            if wheel_symbol == Some(id) {
                return Err(ConfigError::ConflictingReelSymbol(id));
            }
        }

        let scatters: HashSet<SymbolId> =
            symbols.ids_in(SymbolCategory::Scatter).into_iter().collect();
        if !self.scatter_free_spin_table.is_empty() && scatters.is_empty() {
            return Err(ConfigError::InvalidValue(
                "scatterFreeSpinTable set but no scatter symbol defined".into(),
            ));
        }
        Ok(())
    }
}

fn check_multiplier(context: &str, value: f64, allow_zero: bool) -> ConfigResult<()> {
    let ok = value.is_finite() && if allow_zero { value >= 0.0 } else { value > 0.0 };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidMultiplier {
            context: context.to_string(),
            value,
        })
    }
}
