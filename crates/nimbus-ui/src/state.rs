//! Search/selection state machine.
//!
//! Holds the draft query, the confirmed query and the selected location id.
//! Mutated only through the named transitions below; fetch code reads it.

use nimbus_weather::GeocodeCandidate;

/// Conceptual phase derived from the state and the current candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing confirmed yet
    Idle,
    /// A query is confirmed; candidates pending or shown, nothing valid selected
    Searching,
    /// The selection resolves to a candidate in the current set
    Selected,
}

/// A confirmed query that should be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub query: String,
    /// Increments on every submit, including repeats of the same text
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    draft_query: String,
    confirmed_query: String,
    selected_location_id: Option<i64>,
    generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft_query(&self) -> &str {
        &self.draft_query
    }

    pub fn confirmed_query(&self) -> &str {
        &self.confirmed_query
    }

    pub fn selected_location_id(&self) -> Option<i64> {
        self.selected_location_id
    }

    /// Number of submissions so far (0 = idle)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once any query has been confirmed, even an empty one.
    pub fn has_confirmed_query(&self) -> bool {
        self.generation > 0
    }

    /// Staged edit. Does not touch the confirmed query or selection.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft_query = text.into();
    }

    /// Confirm the draft. Always resets the selection, even when the text
    /// equals the previous confirmed query.
    pub fn submit(&mut self) -> Submission {
        self.confirmed_query = self.draft_query.clone();
        self.selected_location_id = None;
        self.generation += 1;
        Submission {
            query: self.confirmed_query.clone(),
            generation: self.generation,
        }
    }

    pub fn select(&mut self, id: i64) {
        self.selected_location_id = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected_location_id = None;
    }

    /// The candidate matching the selected id. A stale id (not in
    /// `candidates`) counts as no selection.
    pub fn resolved_location<'a>(
        &self,
        candidates: &'a [GeocodeCandidate],
    ) -> Option<&'a GeocodeCandidate> {
        let id = self.selected_location_id?;
        candidates.iter().find(|candidate| candidate.id == id)
    }

    pub fn phase(&self, candidates: Option<&[GeocodeCandidate]>) -> SearchPhase {
        if !self.has_confirmed_query() {
            return SearchPhase::Idle;
        }
        match candidates.and_then(|c| self.resolved_location(c)) {
            Some(_) => SearchPhase::Selected,
            None => SearchPhase::Searching,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<GeocodeCandidate> {
        vec![
            GeocodeCandidate {
                id: 1,
                name: "Berlin".into(),
                country_code: "DE".into(),
                latitude: 52.52,
                longitude: 13.405,
            },
            GeocodeCandidate {
                id: 2,
                name: "Paris".into(),
                country_code: "FR".into(),
                latitude: 48.8566,
                longitude: 2.3522,
            },
        ]
    }

    #[test]
    fn starts_idle() {
        let state = SearchState::new();
        assert_eq!(state.draft_query(), "");
        assert_eq!(state.confirmed_query(), "");
        assert_eq!(state.selected_location_id(), None);
        assert_eq!(state.phase(None), SearchPhase::Idle);
    }

    #[test]
    fn draft_edits_do_not_confirm() {
        let mut state = SearchState::new();
        state.set_draft("Ber");
        state.set_draft("Berlin");
        assert_eq!(state.draft_query(), "Berlin");
        assert_eq!(state.confirmed_query(), "");
        assert_eq!(state.phase(None), SearchPhase::Idle);
    }

    #[test]
    fn submit_copies_draft_and_resets_selection() {
        for prior_selection in [None, Some(1), Some(99)] {
            let mut state = SearchState::new();
            if let Some(id) = prior_selection {
                state.select(id);
            }
            state.set_draft("Berlin");
            let submission = state.submit();

            assert_eq!(submission.query, "Berlin");
            assert_eq!(state.confirmed_query(), "Berlin");
            assert_eq!(state.selected_location_id(), None);
        }
    }

    #[test]
    fn resubmitting_same_query_resets_selection() {
        let mut state = SearchState::new();
        state.set_draft("Berlin");
        let first = state.submit();
        state.select(1);
        let second = state.submit();

        assert_eq!(first.query, second.query);
        assert!(second.generation > first.generation);
        assert_eq!(state.selected_location_id(), None);
    }

    #[test]
    fn empty_submit_is_a_confirmed_query() {
        let mut state = SearchState::new();
        let submission = state.submit();
        assert_eq!(submission.query, "");
        assert_eq!(state.phase(None), SearchPhase::Searching);
    }

    #[test]
    fn resolved_location_matches_selected_id() {
        let list = candidates();
        let mut state = SearchState::new();
        state.set_draft("Berlin");
        state.submit();
        state.select(1);

        assert_eq!(state.resolved_location(&list), Some(&list[0]));
        assert_eq!(state.phase(Some(&list)), SearchPhase::Selected);
    }

    #[test]
    fn stale_id_resolves_to_nothing() {
        let list = candidates();
        let mut state = SearchState::new();
        state.submit();
        state.select(42);

        assert_eq!(state.selected_location_id(), Some(42));
        assert_eq!(state.resolved_location(&list), None);
        assert_eq!(state.phase(Some(&list)), SearchPhase::Searching);
    }

    #[test]
    fn clear_selection_returns_to_searching() {
        let list = candidates();
        let mut state = SearchState::new();
        state.submit();
        state.select(2);
        state.clear_selection();
        assert_eq!(state.phase(Some(&list)), SearchPhase::Searching);
    }
}
