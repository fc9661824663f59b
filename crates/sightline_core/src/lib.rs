//! Sightline Core
//!
//! Foundational primitives shared by the Sightline navigation engine:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` in container coordinates
//! - **Key Events**: A small, platform-neutral key model for roving focus
//! - **Observables**: Shared values with change-only subscriber notification
//! - **Errors**: The `NavError` taxonomy (all handled locally, never fatal)
//! - **Host Traits**: The collaborator surface a renderer implements so the
//!   engine can read element geometry and drive the scroll container
//!
//! # Example
//!
//! ```rust
//! use sightline_core::Observable;
//!
//! let active: Observable<Option<String>> = Observable::new(None);
//! let _sub = active.subscribe(|id| println!("active section: {:?}", id));
//!
//! assert!(active.set(Some("intro".to_string())));
//! // Setting the same value again does not notify
//! assert!(!active.set(Some("intro".to_string())));
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod observable;

pub use error::{ElementKind, NavError};
pub use events::{Key, KeyEvent, Modifiers, TouchPoint};
pub use geometry::{Orientation, Point, Rect, Size};
pub use host::{ElementLookup, NavHost, Presentation, ScrollContainer, SectionDescriptor, SectionId};
pub use observable::{Observable, SubscriptionId};
