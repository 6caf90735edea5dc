//! Random selection and the currently held where/what pair.

use database::{Suggestion, SuggestionKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pick one candidate uniformly at random.
///
/// Returns `None` for an empty candidate list. Selection is memoryless.
pub fn choose<T, R: Rng + ?Sized>(mut candidates: Vec<T>, rng: &mut R) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

/// A where/what pairing ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub where_to_go: String,
    pub what_to_do: String,
}

/// The suggestions currently shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub current_where: Option<Suggestion>,
    #[serde(default)]
    pub current_what: Option<Suggestion>,
}

impl Selection {
    pub fn get(&self, kind: SuggestionKind) -> Option<&Suggestion> {
        match kind {
            SuggestionKind::Where => self.current_where.as_ref(),
            SuggestionKind::What => self.current_what.as_ref(),
        }
    }

    /// Replace the held suggestion of `kind`.
    ///
    /// When the new value is present and the other kind is already held, the
    /// resulting pair is returned so the caller can record it.
    pub fn set(&mut self, kind: SuggestionKind, suggestion: Option<Suggestion>) -> Option<Pairing> {
        let pairing = match (&suggestion, self.get(kind.counterpart())) {
            (Some(new), Some(other)) => Some(match kind {
                SuggestionKind::Where => Pairing {
                    where_to_go: new.content.clone(),
                    what_to_do: other.content.clone(),
                },
                SuggestionKind::What => Pairing {
                    where_to_go: other.content.clone(),
                    what_to_do: new.content.clone(),
                },
            }),
            _ => None,
        };

        match kind {
            SuggestionKind::Where => self.current_where = suggestion,
            SuggestionKind::What => self.current_what = suggestion,
        }

        pairing
    }

    /// Drop both held suggestions.
    pub fn reset(&mut self) {
        self.current_where = None;
        self.current_what = None;
    }
}
