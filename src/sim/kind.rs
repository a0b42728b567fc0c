//! Entity kinds and the beats relation
//!
//! Kinds are indices into a [`Roster`]. The roster order defines the dominance
//! cycle: kind `i` beats kind `i - 1` (wrapping), so `[rock, paper, scissors]`
//! gives paper > rock, scissors > paper, rock > scissors.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Index of a kind within its roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Kind(pub u8);

impl Kind {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Display data for one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindInfo {
    pub name: String,
    pub glyph: String,
}

impl KindInfo {
    pub fn new(name: &str, glyph: &str) -> Self {
        Self {
            name: name.to_string(),
            glyph: glyph.to_string(),
        }
    }
}

/// Ordered set of kinds forming a dominance cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    kinds: Vec<KindInfo>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::classic()
    }
}

impl Roster {
    /// Rock, paper, scissors
    pub fn classic() -> Self {
        Self {
            kinds: vec![
                KindInfo::new("rock", "🪨"),
                KindInfo::new("paper", "📄"),
                KindInfo::new("scissors", "✂️"),
            ],
        }
    }

    /// Build a roster from kinds listed in beats order
    pub fn new(kinds: Vec<KindInfo>) -> Result<Self, SimError> {
        let roster = Self { kinds };
        roster.validate()?;
        Ok(roster)
    }

    /// A cycle needs an odd number of kinds, at least three
    pub fn validate(&self) -> Result<(), SimError> {
        let n = self.kinds.len();
        if n < 3 || n % 2 == 0 {
            return Err(SimError::InvalidConfig(format!(
                "roster needs an odd number of kinds (at least 3), got {n}"
            )));
        }
        if n > u8::MAX as usize {
            return Err(SimError::InvalidConfig(format!("roster of {n} kinds is too large")));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Kind for a spawn slot, cycling through the roster
    pub fn cycle(&self, slot: usize) -> Kind {
        Kind((slot % self.kinds.len()) as u8)
    }

    /// All kinds in roster order
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        (0..self.kinds.len()).map(|i| Kind(i as u8))
    }

    /// The kind that `kind` converts on contact
    pub fn beats(&self, kind: Kind) -> Kind {
        let n = self.kinds.len();
        Kind(((kind.index() + n - 1) % n) as u8)
    }

    /// Whether `a` converts `b` on contact
    #[inline]
    pub fn dominates(&self, a: Kind, b: Kind) -> bool {
        self.beats(a) == b
    }

    pub fn info(&self, kind: Kind) -> Option<&KindInfo> {
        self.kinds.get(kind.index())
    }

    pub fn glyph(&self, kind: Kind) -> &str {
        self.info(kind).map(|k| k.glyph.as_str()).unwrap_or("?")
    }

    pub fn name(&self, kind: Kind) -> &str {
        self.info(kind).map(|k| k.name.as_str()).unwrap_or("unknown")
    }

    pub fn find(&self, name: &str) -> Option<Kind> {
        self.kinds
            .iter()
            .position(|k| k.name.eq_ignore_ascii_case(name))
            .map(|i| Kind(i as u8))
    }
}
