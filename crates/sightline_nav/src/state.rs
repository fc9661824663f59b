//! Active section state
//!
//! The single source of truth for which section is current. Two writers
//! exist and only one of them is honoured at a time:
//!
//! - `Writer::Detector` in automatic mode (scroll position decides)
//! - `Writer::Command` in externally-controlled mode (`navigate` decides)
//!
//! Writes from the other writer are dropped. Clearing (when the active
//! section leaves the list) is always allowed.

use sightline_core::{Observable, SectionId};

/// Who is asking to change the active section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Writer {
    Detector,
    Command,
}

#[derive(Debug, Clone, Default)]
pub struct ActiveSectionState {
    active: Observable<Option<SectionId>>,
    externally_controlled: bool,
}

impl ActiveSectionState {
    pub fn new(externally_controlled: bool) -> Self {
        Self {
            active: Observable::new(None),
            externally_controlled,
        }
    }

    pub fn observable(&self) -> &Observable<Option<SectionId>> {
        &self.active
    }

    pub fn get(&self) -> Option<SectionId> {
        self.active.get()
    }

    pub fn is(&self, id: &SectionId) -> bool {
        self.active.get().as_ref() == Some(id)
    }

    pub fn is_controlled(&self) -> bool {
        self.externally_controlled
    }

    pub fn set_controlled(&mut self, controlled: bool) {
        if self.externally_controlled != controlled {
            tracing::debug!("ActiveSectionState: externally controlled = {}", controlled);
            self.externally_controlled = controlled;
        }
    }

    /// Whether `writer` may currently write
    pub fn accepts(&self, writer: Writer) -> bool {
        match writer {
            Writer::Detector => !self.externally_controlled,
            Writer::Command => self.externally_controlled,
        }
    }

    /// Write `id` on behalf of `writer`. Returns true if the value changed.
    pub fn write(&self, writer: Writer, id: SectionId) -> bool {
        if !self.accepts(writer) {
            tracing::trace!("ActiveSectionState: ignoring {:?} write of `{}`", writer, id);
            return false;
        }
        let changed = self.active.set(Some(id));
        if changed {
            tracing::debug!("ActiveSectionState: active = {:?}", self.active.get());
        }
        changed
    }

    /// Drop the active section regardless of writer
    pub fn clear(&self) -> bool {
        self.active.set(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_writes_in_auto_mode_only() {
        let mut state = ActiveSectionState::new(false);
        assert!(state.write(Writer::Detector, "a".into()));
        assert!(!state.write(Writer::Command, "b".into()));
        assert!(state.is(&"a".into()));

        state.set_controlled(true);
        assert!(!state.write(Writer::Detector, "c".into()));
        assert!(state.write(Writer::Command, "b".into()));
        assert_eq!(state.get(), Some("b".into()));
    }

    #[test]
    fn test_repeated_write_is_not_a_change() {
        let state = ActiveSectionState::new(false);
        assert!(state.write(Writer::Detector, "a".into()));
        assert!(!state.write(Writer::Detector, "a".into()));
        assert!(state.clear());
        assert!(!state.clear());
    }
}
