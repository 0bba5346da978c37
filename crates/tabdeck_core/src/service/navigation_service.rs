//! Tab navigation state.

use crate::model::section::Section;
use log::debug;

/// Tracks which section the shell shows. Exactly one section is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    active: Section,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn select(&mut self, section: Section) {
        self.active = section;
        debug!("event=nav_select module=navigation section={section}");
    }

    /// Activates the section with id `section_id`.
    ///
    /// Unknown ids leave the active section unchanged and return `None`.
    pub fn go_to(&mut self, section_id: &str) -> Option<Section> {
        let section = Section::parse(section_id)?;
        self.select(section);
        Some(section)
    }

    pub fn is_active(&self, section: Section) -> bool {
        self.active == section
    }
}
