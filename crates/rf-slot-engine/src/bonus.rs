//! Multiplier reel and bonus wheel

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, MultiplierReelEntry, WheelSegment};
use crate::error::ConfigResult;
use crate::rng::WeightTable;
use crate::symbols::SymbolId;

/// What the multiplier reel landed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReelOutcome {
    Multiplier { symbol: SymbolId, multiplier: f64 },
    /// `granted` is false once the consecutive respin limit is hit
    Respin { symbol: SymbolId, granted: bool },
    BonusWheel { symbol: SymbolId },
}

impl ReelOutcome {
    /// Multiplier applied to the spin's base win
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Multiplier { multiplier, .. } => *multiplier,
            _ => 1.0,
        }
    }
}

/// Secondary weighted reel drawn once after the grid settles
#[derive(Debug, Clone)]
pub struct MultiplierReel {
    table: WeightTable<MultiplierReelEntry>,
    respin_symbol: Option<SymbolId>,
    wheel_symbol: Option<SymbolId>,
}

impl MultiplierReel {
    pub fn from_config(config: &GameConfig) -> ConfigResult<Option<Self>> {
        let Some(reel) = &config.multiplier_reel else {
            return Ok(None);
        };
        let entries = reel.entries.iter().map(|e| (e.clone(), e.weight));
        let table = WeightTable::new("multiplierReel", entries)?;
        Ok(Some(Self {
            table,
            respin_symbol: config.respin_symbol,
            wheel_symbol: config.bonus_wheel.as_ref().and_then(|w| w.trigger_symbol),
        }))
    }

    /// Draw one stop. Respins come back as granted; the caller applies the limit.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ReelOutcome {
        let entry = self.table.draw(rng);
        if Some(entry.symbol) == self.respin_symbol {
            ReelOutcome::Respin {
                symbol: entry.symbol,
                granted: true,
            }
        } else if Some(entry.symbol) == self.wheel_symbol {
            ReelOutcome::BonusWheel { symbol: entry.symbol }
        } else {
            ReelOutcome::Multiplier {
                symbol: entry.symbol,
                multiplier: entry.multiplier.unwrap_or(1.0),
            }
        }
    }

    pub fn entries(&self) -> &[MultiplierReelEntry] {
        self.table.items()
    }
}

/// Result of a bonus wheel draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusWheelResult {
    /// Index of the landed segment
    pub segment: usize,
    pub label: String,
    pub multiplier: f64,
    pub base_win: f64,
    pub final_win: f64,
}

/// Weighted wheel of win multipliers
#[derive(Debug, Clone)]
pub struct BonusWheel {
    table: WeightTable<WheelSegment>,
}

impl BonusWheel {
    pub fn from_config(config: &GameConfig) -> ConfigResult<Option<Self>> {
        let Some(wheel) = &config.bonus_wheel else {
            return Ok(None);
        };
        let segments = wheel.segments.iter().map(|s| (s.clone(), s.weight));
        let table = WeightTable::new("bonusWheel", segments)?;
        Ok(Some(Self { table }))
    }

    pub fn spin<R: Rng + ?Sized>(&self, base_win: f64, rng: &mut R) -> BonusWheelResult {
        let segment = self.table.draw_index(rng);
        let landed = &self.table.items()[segment];
        BonusWheelResult {
            segment,
            label: landed.label.clone(),
            multiplier: landed.multiplier,
            base_win,
            final_win: base_win * landed.multiplier,
        }
    }

    pub fn segments(&self) -> &[WheelSegment] {
        self.table.items()
    }

    /// Expected multiplier over all segments
    pub fn expected_multiplier(&self) -> f64 {
        (0..self.table.len())
            .map(|i| self.table.probability(i) * self.table.items()[i].multiplier)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::rng::seeded;

    #[test]
    fn test_reel_outcomes_follow_mapping() {
        let config = presets::multiplier_reel();
        let reel = MultiplierReel::from_config(&config).unwrap().unwrap();
        let respin = config.respin_symbol;
        let wheel = config.bonus_wheel.as_ref().and_then(|w| w.trigger_symbol);
        let mut rng = seeded(4);
        let (mut respins, mut wheels, mut multipliers) = (0, 0, 0);

        for _ in 0..5_000 {
            match reel.draw(&mut rng) {
                ReelOutcome::Respin { symbol, granted } => {
                    assert_eq!(Some(symbol), respin);
                    assert!(granted);
                    respins += 1;
                }
                ReelOutcome::BonusWheel { symbol } => {
                    assert_eq!(Some(symbol), wheel);
                    wheels += 1;
                }
                ReelOutcome::Multiplier { multiplier, .. } => {
                    assert!(multiplier >= 1.0);
                    multipliers += 1;
                }
            }
        }
        assert!(respins > 0 && wheels > 0 && multipliers > 0);
    }

    #[test]
    fn test_wheel_multiplies_base_win() {
        let config = presets::multiplier_reel();
        let wheel = BonusWheel::from_config(&config).unwrap().unwrap();
        let mut rng = seeded(9);
        for _ in 0..100 {
            let result = wheel.spin(2.5, &mut rng);
            assert_eq!(result.multiplier, wheel.segments()[result.segment].multiplier);
            assert!((result.final_win - 2.5 * result.multiplier).abs() < 1e-12);
        }
        assert!(wheel.expected_multiplier() > 1.0);
    }

    #[test]
    fn test_absent_reel_and_wheel() {
        let config = presets::line_slot();
        assert!(MultiplierReel::from_config(&config).unwrap().is_none());
        assert!(BonusWheel::from_config(&config).unwrap().is_none());
    }
}
