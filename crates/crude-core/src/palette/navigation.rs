//! Local navigation matching: action/model pairs computed without a network
//! round trip.

use super::results::SearchEntry;

/// Entry page an action navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Browse,
    Edit,
}

impl Action {
    pub const ALL: [Self; 2] = [Self::Browse, Self::Edit];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Edit => "edit",
        }
    }
}

/// Compute navigation suggestions for `text`.
///
/// Each whitespace-separated word collects every action and every model whose
/// name contains it; matches are concatenated across words without
/// de-duplication. An empty side falls back to the full set, unless both
/// sides are empty, in which case nothing is suggested. Entries are the cross
/// product with models as the outer loop.
pub fn navigation_entries(text: &str, models: &[String], actions: &[Action]) -> Vec<SearchEntry> {
    let mut found_actions: Vec<Action> = Vec::new();
    let mut found_models: Vec<&str> = Vec::new();

    // Matching ignores case; fold each name and word once.
    let folded_models: Vec<(String, &str)> = models
        .iter()
        .map(|model| (model.to_lowercase(), model.as_str()))
        .collect();

    for word in text.split_whitespace() {
        let word = word.to_lowercase();
        found_actions.extend(
            actions
                .iter()
                .copied()
                .filter(|action| action.as_str().contains(&word)),
        );
        found_models.extend(
            folded_models
                .iter()
                .filter(|(folded, _)| folded.contains(&word))
                .map(|(_, model)| *model),
        );
    }

    if found_actions.is_empty() && found_models.is_empty() {
        return Vec::new();
    }
    if found_actions.is_empty() {
        found_actions.extend_from_slice(actions);
    }
    if found_models.is_empty() {
        found_models.extend(models.iter().map(String::as_str));
    }

    found_models
        .iter()
        .flat_map(|model| {
            found_actions
                .iter()
                .map(move |action| SearchEntry::navigation(*action, model))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models() -> Vec<String> {
        vec!["Widget".to_string(), "Gadget".to_string()]
    }

    fn labels(entries: &[SearchEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn model_word_pairs_with_every_action() {
        let entries = navigation_entries("widg", &models(), &Action::ALL);
        assert_eq!(labels(&entries), vec!["browse->Widget", "edit->Widget"]);
        assert_eq!(entries[0].url, "/entries/browse/Widget");
    }

    #[test]
    fn action_word_pairs_with_every_model() {
        let entries = navigation_entries("edi", &models(), &Action::ALL);
        assert_eq!(labels(&entries), vec!["edit->Widget", "edit->Gadget"]);
    }

    #[test]
    fn action_and_model_words_narrow_both_sides() {
        let entries = navigation_entries("brow Gadg", &models(), &Action::ALL);
        assert_eq!(labels(&entries), vec!["browse->Gadget"]);
    }

    #[test]
    fn matching_ignores_case_on_both_sides() {
        let models = vec!["WIDGET".to_string(), "gadget".to_string()];
        let entries = navigation_entries("EDIT wIdG", &models, &Action::ALL);
        assert_eq!(labels(&entries), vec!["edit->WIDGET"]);
        assert_eq!(entries[0].url, "/entries/edit/WIDGET");
    }

    #[test]
    fn no_match_yields_nothing() {
        assert!(navigation_entries("zzz", &models(), &Action::ALL).is_empty());
    }

    #[test]
    fn duplicates_across_words_are_kept() {
        let entries = navigation_entries("dget get", &models(), &[Action::Browse]);
        assert_eq!(
            labels(&entries),
            vec![
                "browse->Widget",
                "browse->Gadget",
                "browse->Widget",
                "browse->Gadget"
            ]
        );
    }

    #[test]
    fn shared_substring_matches_all_models_in_order() {
        let entries = navigation_entries("dget", &models(), &Action::ALL);
        assert_eq!(
            labels(&entries),
            vec![
                "browse->Widget",
                "edit->Widget",
                "browse->Gadget",
                "edit->Gadget"
            ]
        );
    }

    #[test]
    fn empty_model_list_still_offers_nothing_for_action_words() {
        assert!(navigation_entries("browse", &[], &Action::ALL).is_empty());
    }
}
