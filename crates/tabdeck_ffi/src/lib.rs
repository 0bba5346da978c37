//! Flutter bridge for the TabDeck widgets.

pub mod api;
