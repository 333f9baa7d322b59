//! Grouped suggestion results and the flat row list rendered from them.

use std::fmt;

use indexmap::IndexMap;

use super::navigation::Action;
use crate::search::RemoteEntry;

/// One selectable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub url: String,
    pub label: String,
    /// Compound `{model}/{oid}` id; navigation suggestions have none.
    pub id: Option<String>,
}

impl SearchEntry {
    /// Local navigation suggestion for `action` on `model`.
    pub fn navigation(action: Action, model: &str) -> Self {
        Self {
            url: format!("/entries/{}/{model}", action.as_str()),
            label: format!("{}->{model}", action.as_str()),
            id: None,
        }
    }

    /// Suggestion for an entry found by a remote search of `model`.
    pub fn from_remote(model: &str, entry: &RemoteEntry) -> Self {
        let id = entry.compound_id(model);
        Self {
            url: format!("/entries/read/{id}"),
            label: entry.display.clone(),
            id: Some(id),
        }
    }
}

/// Key of a result group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Locally computed action/model pairs.
    Navigation,
    /// Remote search results for one model.
    Model(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigation => f.write_str("navigation"),
            Self::Model(name) => f.write_str(name),
        }
    }
}

/// A rendered row of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Group header; never selectable.
    Separator(String),
    Entry(SearchEntry),
}

impl Row {
    pub const fn entry(&self) -> Option<&SearchEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Separator(_) => None,
        }
    }

    pub const fn is_separator(&self) -> bool {
        matches!(self, Self::Separator(_))
    }
}

/// Result groups in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResultGroups {
    groups: IndexMap<GroupKey, Vec<SearchEntry>>,
}

impl ResultGroups {
    /// Replace a group's entries. A group that already exists keeps its
    /// display position.
    pub fn set(&mut self, key: GroupKey, entries: Vec<SearchEntry>) {
        self.groups.insert(key, entries);
    }

    pub fn get(&self, key: &GroupKey) -> Option<&[SearchEntry]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[SearchEntry])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Flatten into rows: one separator per non-empty group, then its entries.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (key, entries) in self.iter() {
            if entries.is_empty() {
                continue;
            }
            rows.push(Row::Separator(key.to_string()));
            rows.extend(entries.iter().cloned().map(Row::Entry));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ObjectId;

    fn remote(oid: &str, display: &str) -> RemoteEntry {
        RemoteEntry {
            id: ObjectId { oid: oid.into() },
            display: display.into(),
        }
    }

    #[test]
    fn navigation_entry_shape() {
        let entry = SearchEntry::navigation(Action::Edit, "Widget");
        assert_eq!(entry.url, "/entries/edit/Widget");
        assert_eq!(entry.label, "edit->Widget");
        assert!(entry.id.is_none());
    }

    #[test]
    fn remote_entry_shape() {
        let entry = SearchEntry::from_remote("Gadget", &remote("abc", "Blue gadget"));
        assert_eq!(entry.url, "/entries/read/Gadget/abc");
        assert_eq!(entry.label, "Blue gadget");
        assert_eq!(entry.id.as_deref(), Some("Gadget/abc"));
    }

    #[test]
    fn rows_skip_empty_groups_and_keep_order() {
        let mut groups = ResultGroups::default();
        groups.set(
            GroupKey::Navigation,
            vec![SearchEntry::navigation(Action::Browse, "Widget")],
        );
        groups.set(GroupKey::Model("Widget".into()), Vec::new());
        groups.set(
            GroupKey::Model("Gadget".into()),
            vec![SearchEntry::from_remote("Gadget", &remote("1", "g1"))],
        );

        let rows = groups.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], Row::Separator("navigation".into()));
        assert_eq!(rows[2], Row::Separator("Gadget".into()));
        assert!(rows[3].entry().is_some());
    }

    #[test]
    fn resetting_a_group_keeps_its_position() {
        let mut groups = ResultGroups::default();
        groups.set(GroupKey::Model("Widget".into()), Vec::new());
        groups.set(
            GroupKey::Navigation,
            vec![SearchEntry::navigation(Action::Browse, "Widget")],
        );
        groups.set(
            GroupKey::Model("Widget".into()),
            vec![SearchEntry::from_remote("Widget", &remote("1", "w1"))],
        );

        let keys: Vec<String> = groups.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["Widget", "navigation"]);
    }

    #[test]
    fn empty_groups_count_as_empty() {
        let mut groups = ResultGroups::default();
        assert!(groups.is_empty());
        groups.set(GroupKey::Navigation, Vec::new());
        assert!(groups.is_empty());
        assert!(groups.rows().is_empty());
    }
}
