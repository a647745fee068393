use serde::Serialize;

/// Change notification produced by dictionary mutations.
///
/// Hosts drain these with [`Dictionary::take_events`](super::Dictionary::take_events)
/// to refresh views or schedule re-validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DictionaryEvent {
    KeyAdded(String),
    KeyRemoved(String),
    /// A full key lost its text but stays as an intermediate node
    KeyDemoted(String),
    NodeConverted { key: String, is_namespace: bool },
    TextChanged { key: String, culture: String },
    CommentChanged(String),
    CultureAdded(String),
    CultureRemoved(String),
    PrimaryCultureChanged(Option<String>),
}
