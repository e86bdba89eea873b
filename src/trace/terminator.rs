use super::{TransferKind, TransferRecord};
use crate::error::{NoveltyError, Result};
use std::fmt;

/// Transfer kinds that may end a counted window.
///
/// Only windows whose last record has an enabled kind reach the novelty
/// accumulator. Kept as a bitmask since it is consulted once per record.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminatorFilter {
    mask: u8,
}

impl TerminatorFilter {
    pub const SELECTABLE: [TransferKind; 3] = [
        TransferKind::Return,
        TransferKind::IndirectCall,
        TransferKind::IndirectJump,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kinds<I>(kinds: I) -> Result<Self>
    where
        I: IntoIterator<Item = TransferKind>,
    {
        kinds
            .into_iter()
            .try_fold(Self::new(), |filter, kind| filter.with(kind))
    }

    /// Enable `kind`. Direct and unknown transfers cannot terminate a window.
    pub fn with(mut self, kind: TransferKind) -> Result<Self> {
        let bit = Self::bit(kind).ok_or_else(|| {
            NoveltyError::InvalidConfig(format!(
                "'{kind}' cannot be used as a sequence terminator"
            ))
        })?;
        self.mask |= bit;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(NoveltyError::NoTerminators);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_enabled(&self, kind: TransferKind) -> bool {
        Self::bit(kind).is_some_and(|bit| self.mask & bit != 0)
    }

    pub fn matches(&self, record: &TransferRecord) -> bool {
        self.is_enabled(record.kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TransferKind> + '_ {
        Self::SELECTABLE
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }

    fn bit(kind: TransferKind) -> Option<u8> {
        match kind {
            TransferKind::Return => Some(0b001),
            TransferKind::IndirectCall => Some(0b010),
            TransferKind::IndirectJump => Some(0b100),
            TransferKind::Direct | TransferKind::Other => None,
        }
    }
}

impl fmt::Debug for TerminatorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}
