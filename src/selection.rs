//! Option Selections

use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

/// At most this many option values may be chosen individually.
pub const MAX_SELECTED_VALUES: usize = 2;

/// Errors raised while building a selection.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// More than [`MAX_SELECTED_VALUES`] values were given.
    #[error("at most {MAX_SELECTED_VALUES} option values may be selected, got {0}")]
    TooManyValues(usize),

    /// The same value appeared twice.
    #[error("option value {0} was selected more than once")]
    DuplicateValue(Uuid),

    /// Individual values and a combination were both given.
    #[error("option values and an option combination cannot be selected together")]
    MixedSelection,
}

/// Option Selection
///
/// The options chosen for one line. Values are kept sorted so two selections
/// of the same values compare equal regardless of the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum OptionSelection {
    /// No options.
    #[default]
    None,

    /// One or two individually selected values.
    Values(SmallVec<[Uuid; MAX_SELECTED_VALUES]>),

    /// A combination selected as a whole.
    Combination(Uuid),
}

impl OptionSelection {
    /// Build a selection from raw request parts.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] when too many or duplicate values are given,
    /// or when values are mixed with a combination.
    pub fn from_parts(
        values: impl IntoIterator<Item = Uuid>,
        combination: Option<Uuid>,
    ) -> Result<Self, SelectionError> {
        let mut values: SmallVec<[Uuid; MAX_SELECTED_VALUES]> = values.into_iter().collect();

        if values.len() > MAX_SELECTED_VALUES {
            return Err(SelectionError::TooManyValues(values.len()));
        }

        values.sort_unstable();

        if let Some(pair) = values.windows(2).find(|pair| pair.first() == pair.get(1))
            && let Some(duplicate) = pair.first()
        {
            return Err(SelectionError::DuplicateValue(*duplicate));
        }

        match (values.is_empty(), combination) {
            (true, None) => Ok(Self::None),
            (true, Some(combination)) => Ok(Self::Combination(combination)),
            (false, None) => Ok(Self::Values(values)),
            (false, Some(_)) => Err(SelectionError::MixedSelection),
        }
    }

    /// Individually selected values, sorted.
    pub fn values(&self) -> &[Uuid] {
        match self {
            Self::Values(values) => values,
            Self::None | Self::Combination(_) => &[],
        }
    }

    /// The selected combination, if any.
    pub fn combination(&self) -> Option<Uuid> {
        match self {
            Self::Combination(uuid) => Some(*uuid),
            Self::None | Self::Values(_) => None,
        }
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }
}
