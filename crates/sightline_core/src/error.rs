//! Error taxonomy for the navigation engine
//!
//! The engine is a best-effort presentational layer: every error here is
//! handled where it occurs (logged at most) and degrades to "no animation /
//! no indicator". None of them surfaces to a caller of `navigate`.

use thiserror::Error;

use crate::host::SectionId;

/// Which kind of element failed to resolve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Section,
    NavItem,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Section => f.write_str("section"),
            ElementKind::NavItem => f.write_str("nav item"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NavError {
    /// A section or nav item id has no resolvable element right now
    #[error("no element for {kind} `{id}`")]
    MissingElement { kind: ElementKind, id: SectionId },

    /// The host cannot provide geometry yet (headless or not mounted)
    #[error("environment unavailable: {0}")]
    EnvironmentUnavailable(&'static str),

    /// A frame or timer fired for a disposed instance or superseded animation
    #[error("stale reference: {what}")]
    StaleReference { what: &'static str },

    /// The id is not part of the current section list
    #[error("unknown section `{0}`")]
    UnknownSection(SectionId),
}

impl NavError {
    pub fn missing_section(id: &SectionId) -> Self {
        NavError::MissingElement {
            kind: ElementKind::Section,
            id: id.clone(),
        }
    }

    pub fn missing_nav_item(id: &SectionId) -> Self {
        NavError::MissingElement {
            kind: ElementKind::NavItem,
            id: id.clone(),
        }
    }

    /// Log this error at the level its kind warrants
    pub fn log(&self) {
        match self {
            NavError::MissingElement { .. } | NavError::UnknownSection(_) => {
                tracing::warn!("{}", self)
            }
            NavError::EnvironmentUnavailable(_) | NavError::StaleReference { .. } => {
                tracing::debug!("{}", self)
            }
        }
    }
}
