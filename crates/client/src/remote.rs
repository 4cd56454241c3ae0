//! Remote view state.
//!
//! "Not yet loaded" and "loaded but empty" are observably different states
//! to a presentation surface; a bare `Vec` cannot tell them apart.

/// The lifecycle of server-owned data as a view sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Remote<T> {
    /// Nothing has been requested yet.
    #[default]
    NotAsked,
    /// A request is in flight.
    Loading,
    /// The server answered.
    Loaded(T),
    /// The last request failed; the message is displayable.
    Failed(String),
}

impl<T> Remote<T> {
    /// The loaded value, if any.
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// True once the server has answered.
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// True while a request is in flight.
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
