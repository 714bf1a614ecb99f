//! Symbol definitions and reel strips

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Symbol identifier as it appears in configs and grids
pub type SymbolId = u32;

/// Symbol category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolCategory {
    /// Empty position, breaks every run
    Blank,
    /// Low paying symbol
    Low,
    /// High paying symbol
    Premium,
    /// Substitutes for any non-scatter, non-blank symbol
    Wild,
    /// Counted anywhere on the grid, awards free spins
    Scatter,
    /// Bonus trigger symbol (multiplier reel, wheel)
    Bonus,
}

impl SymbolCategory {
    /// Can a wild stand in for this category?
    pub fn is_substitutable(self) -> bool {
        !matches!(self, Self::Blank | Self::Scatter)
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    /// Unique symbol ID
    pub id: SymbolId,
    /// Display glyph or name, opaque to the engine
    pub name: String,
    /// Symbol category
    pub category: SymbolCategory,
    /// Pay multiplier per match count
    #[serde(default)]
    pub pays: BTreeMap<u8, f64>,
    /// Selection weight for weighted draws
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Selection weight during free spins (falls back to `weight`)
    #[serde(default)]
    pub free_spin_weight: Option<f64>,
    /// May appear as a giant symbol
    #[serde(default)]
    pub giant: bool,
    /// Counts towards the wild meter (wilds always count)
    #[serde(default)]
    pub meter_eligible: bool,
}

fn default_weight() -> f64 {
    1.0
}

impl Symbol {
    /// Create a paying symbol
    pub fn paying(
        id: SymbolId,
        name: impl Into<String>,
        category: SymbolCategory,
        pays: &[(u8, f64)],
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            pays: pays.iter().copied().collect(),
            weight: 1.0,
            free_spin_weight: None,
            giant: false,
            meter_eligible: false,
        }
    }

    /// Create a wild symbol
    pub fn wild(id: SymbolId, name: impl Into<String>, pays: &[(u8, f64)]) -> Self {
        Self::paying(id, name, SymbolCategory::Wild, pays)
    }

    /// Create a scatter symbol
    pub fn scatter(id: SymbolId, name: impl Into<String>) -> Self {
        Self::paying(id, name, SymbolCategory::Scatter, &[])
    }

    /// Create a blank symbol
    pub fn blank(id: SymbolId) -> Self {
        Self::paying(id, "BLANK", SymbolCategory::Blank, &[])
    }

    /// Create a bonus symbol
    pub fn bonus(id: SymbolId, name: impl Into<String>) -> Self {
        Self::paying(id, name, SymbolCategory::Bonus, &[])
    }

    /// Set the selection weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the free spin selection weight
    pub fn with_free_spin_weight(mut self, weight: f64) -> Self {
        self.free_spin_weight = Some(weight);
        self
    }

    /// Allow this symbol to appear as a giant symbol
    pub fn with_giant(mut self) -> Self {
        self.giant = true;
        self
    }

    /// Get pay multiplier for an exact match count (0 if unmatched)
    pub fn get_pay(&self, match_count: u8) -> f64 {
        self.pays.get(&match_count).copied().unwrap_or(0.0)
    }

    /// Weight used for draws in the given mode
    pub fn weight_for(&self, free_spins: bool) -> f64 {
        if free_spins {
            self.free_spin_weight.unwrap_or(self.weight)
        } else {
            self.weight
        }
    }

    pub fn is_wild(&self) -> bool {
        self.category == SymbolCategory::Wild
    }

    pub fn is_scatter(&self) -> bool {
        self.category == SymbolCategory::Scatter
    }

    /// Counts towards the wild meter
    pub fn counts_for_meter(&self) -> bool {
        self.is_wild() || self.meter_eligible
    }
}

/// A virtual reel strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelStrip {
    /// Symbol IDs in order
    pub symbols: Vec<SymbolId>,
}

impl ReelStrip {
    /// Create a new reel strip
    pub fn new(symbols: Vec<SymbolId>) -> Self {
        Self { symbols }
    }

    /// Get symbol at position (wraps around)
    pub fn symbol_at(&self, position: usize) -> SymbolId {
        self.symbols[position % self.symbols.len()]
    }

    /// Get total strip length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Indexed symbol lookup
#[derive(Debug, Clone)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
    index: HashMap<SymbolId, usize>,
}

impl SymbolSet {
    /// Build the set, rejecting duplicate ids
    pub fn new(symbols: Vec<Symbol>) -> ConfigResult<Self> {
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if index.insert(symbol.id, i).is_some() {
                return Err(ConfigError::DuplicateSymbol(symbol.id));
            }
        }
        Ok(Self { symbols, index })
    }

    /// Get symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.index.get(&id).map(|&i| &self.symbols[i])
    }

    /// Get symbol by ID, or an error naming what referenced it
    pub fn require(&self, id: SymbolId, context: &str) -> ConfigResult<&Symbol> {
        self.get(id).ok_or_else(|| ConfigError::UnknownSymbol {
            symbol: id,
            context: context.to_string(),
        })
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Category of a symbol; unknown ids behave as blanks
    pub fn category(&self, id: SymbolId) -> SymbolCategory {
        self.get(id).map(|s| s.category).unwrap_or(SymbolCategory::Blank)
    }

    pub fn is_wild(&self, id: SymbolId) -> bool {
        self.category(id) == SymbolCategory::Wild
    }

    pub fn is_scatter(&self, id: SymbolId) -> bool {
        self.category(id) == SymbolCategory::Scatter
    }

    /// IDs of all symbols in a category
    pub fn ids_in(&self, category: SymbolCategory) -> Vec<SymbolId> {
        self.symbols
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.id)
            .collect()
    }
}
