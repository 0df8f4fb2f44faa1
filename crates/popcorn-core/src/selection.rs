use serde::Serialize;

/// Whether a search result is open in the detail pane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "imdb_id")]
pub enum Selection {
    #[default]
    Browsing,
    Viewing(String),
}

impl Selection {
    /// Selecting the open title closes it; any other title opens directly
    pub fn select(&mut self, imdb_id: &str) {
        *self = match self {
            Selection::Viewing(current) if current == imdb_id => Selection::Browsing,
            _ => Selection::Viewing(imdb_id.to_string()),
        };
    }

    pub fn close(&mut self) {
        *self = Selection::Browsing;
    }

    pub fn selected_id(&self) -> Option<&str> {
        match self {
            Selection::Browsing => None,
            Selection::Viewing(id) => Some(id),
        }
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self, Selection::Viewing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_browsing() {
        assert_eq!(Selection::default(), Selection::Browsing);
        assert_eq!(Selection::default().selected_id(), None);
    }

    #[test]
    fn test_select_toggles_same_id() {
        let mut selection = Selection::Browsing;
        selection.select("tt1");
        assert_eq!(selection, Selection::Viewing("tt1".to_string()));

        selection.select("tt1");
        assert_eq!(selection, Selection::Browsing);
    }

    #[test]
    fn test_select_other_id_switches_directly() {
        let mut selection = Selection::Viewing("tt1".to_string());
        selection.select("tt2");
        assert_eq!(selection, Selection::Viewing("tt2".to_string()));
        assert_eq!(selection.selected_id(), Some("tt2"));
    }

    #[test]
    fn test_close() {
        let mut selection = Selection::Viewing("tt1".to_string());
        selection.close();
        assert!(!selection.is_viewing());
        selection.close();
        assert_eq!(selection, Selection::Browsing);
    }
}
