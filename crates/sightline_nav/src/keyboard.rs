//! Roving-focus keyboard navigator
//!
//! Moves a single focus index through an ordered list of labelled items:
//!
//! - Arrow keys along the list's axis step backward/forward, wrapping when
//!   `loop_focus` is set and clamping otherwise
//! - Home/End jump to the first/last item (when enabled)
//! - Enter/Space activate the focused item
//! - Escape fires the escape handler (when enabled)
//! - Printable characters build a type-ahead buffer that jumps to the next
//!   item whose label starts with it
//!
//! ```text
//!            printable char
//!   Idle ─────────────────────▶ TypeAhead ──┐ printable char
//!    ▲                              │  ▲    │ (timer reset)
//!    │   timeout / other key        │  └────┘
//!    └──────────────────────────────┘
//! ```
//!
//! Every key press returns a `KeyAction` so the owner can react without
//! registering callbacks; the optional `on_activate`/`on_escape` handlers are
//! for hosts that prefer them.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sightline_core::{Key, KeyEvent, Orientation, SectionDescriptor};

/// Default type-ahead buffer lifetime in milliseconds
pub const DEFAULT_TYPE_AHEAD_TIMEOUT_MS: u64 = 500;

/// Anything that can be matched by type-ahead
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for String {
    fn label(&self) -> &str {
        self
    }
}

impl Labeled for &str {
    fn label(&self) -> &str {
        self
    }
}

impl Labeled for SectionDescriptor {
    fn label(&self) -> &str {
        &self.title
    }
}

/// Configuration for a keyboard navigator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Which arrow keys move focus (default: vertical)
    pub orientation: Orientation,
    /// Wrap past either end (default: true)
    pub loop_focus: bool,
    /// Home/End jump to the first/last item (default: true)
    pub home_end: bool,
    /// Type-ahead buffer lifetime in milliseconds (default: 500)
    pub type_ahead_timeout_ms: u64,
    /// Escape is handled (default: false)
    pub escape_enabled: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            loop_focus: true,
            home_end: true,
            type_ahead_timeout_ms: DEFAULT_TYPE_AHEAD_TIMEOUT_MS,
            escape_enabled: false,
        }
    }
}

impl KeyboardConfig {
    /// Overlay list: no wrapping, Escape dismisses
    pub fn overlay() -> Self {
        Self {
            loop_focus: false,
            escape_enabled: true,
            ..Default::default()
        }
    }

    /// Horizontal tab strip
    pub fn tabs() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Default::default()
        }
    }

    pub fn type_ahead_timeout(&self) -> Duration {
        Duration::from_millis(self.type_ahead_timeout_ms)
    }
}

/// Accessibility role of a list or its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Tab,
    TabList,
    MenuItem,
    Menu,
}

impl AriaRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaRole::Tab => "tab",
            AriaRole::TabList => "tablist",
            AriaRole::MenuItem => "menuitem",
            AriaRole::Menu => "menu",
        }
    }
}

/// Attributes a renderer applies to one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemProps {
    /// 0 for the focused item, -1 for the rest
    pub tab_index: i32,
    pub role: AriaRole,
    pub selected: bool,
}

/// Navigator state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyboardState {
    #[default]
    Idle,
    /// Buffer is non-empty
    TypeAhead,
}

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Focus moved (or stayed put at a clamped end)
    Moved { from: usize, to: usize },
    /// Enter/Space on this index
    Activated(usize),
    Escaped,
    /// Type-ahead input; `to` is the match, if any
    TypeAhead { to: Option<usize> },
    /// Not consumed; the host should apply its default handling
    Ignored,
}

impl KeyAction {
    /// Whether the host should suppress the key's default behavior
    pub fn is_handled(&self) -> bool {
        !matches!(self, KeyAction::Ignored)
    }
}

type ActivateHandler<T> = Arc<dyn Fn(&T, usize) + Send + Sync>;
type EscapeHandler = Arc<dyn Fn() + Send + Sync>;

// ============================================================================
// Navigator
// ============================================================================

pub struct KeyboardNavigator<T> {
    config: KeyboardConfig,
    items: Vec<T>,
    index: usize,
    state: KeyboardState,
    buffer: String,
    /// When the buffer was last extended
    last_input: Option<Duration>,
    on_activate: Option<ActivateHandler<T>>,
    on_escape: Option<EscapeHandler>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for KeyboardNavigator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardNavigator")
            .field("config", &self.config)
            .field("items", &self.items)
            .field("index", &self.index)
            .field("state", &self.state)
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl<T: Labeled + PartialEq + Clone> KeyboardNavigator<T> {
    pub fn new(config: KeyboardConfig, items: Vec<T>) -> Self {
        Self {
            config,
            items,
            index: 0,
            state: KeyboardState::Idle,
            buffer: String::new(),
            last_input: None,
            on_activate: None,
            on_escape: None,
        }
    }

    /// Handler called with the item and its index on Enter/Space
    pub fn on_activate<F>(mut self, handler: F) -> Self
    where
        F: Fn(&T, usize) + Send + Sync + 'static,
    {
        self.on_activate = Some(Arc::new(handler));
        self
    }

    /// Handler called on Escape (requires `escape_enabled`)
    pub fn on_escape<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_escape = Some(Arc::new(handler));
        self
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> KeyboardState {
        self.state
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the items. Focus resets to the first item when the list
    /// identity changed. Returns whether it did.
    pub fn set_items(&mut self, items: Vec<T>) -> bool {
        if items == self.items {
            return false;
        }
        self.items = items;
        self.index = 0;
        self.clear_buffer();
        true
    }

    /// Move focus without a key press. Out-of-range indices are ignored.
    pub fn set_index(&mut self, index: usize) -> bool {
        if index < self.items.len() && index != self.index {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Drop the type-ahead buffer if it timed out by `now`
    pub fn expire(&mut self, now: Duration) {
        if let Some(last) = self.last_input {
            if now.saturating_sub(last) >= self.config.type_ahead_timeout() {
                self.clear_buffer();
            }
        }
    }

    /// When the current type-ahead buffer will expire
    pub fn type_ahead_deadline(&self) -> Option<Duration> {
        self.last_input
            .map(|last| last + self.config.type_ahead_timeout())
    }

    pub fn item_props(&self, index: usize) -> ItemProps {
        ItemProps {
            tab_index: if index == self.index { 0 } else { -1 },
            role: self.item_role(),
            selected: index == self.index,
        }
    }

    pub fn item_role(&self) -> AriaRole {
        match self.config.orientation {
            Orientation::Horizontal => AriaRole::Tab,
            Orientation::Vertical => AriaRole::MenuItem,
        }
    }

    pub fn list_role(&self) -> AriaRole {
        match self.config.orientation {
            Orientation::Horizontal => AriaRole::TabList,
            Orientation::Vertical => AriaRole::Menu,
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent, now: Duration) -> KeyAction {
        if self.items.is_empty() {
            return KeyAction::Ignored;
        }

        self.expire(now);

        if let Some(c) = event.printable_char() {
            return self.type_ahead(c, now);
        }

        // Any other key ends a type-ahead run
        self.clear_buffer();

        let (backward, forward) = match self.config.orientation {
            Orientation::Horizontal => (Key::ArrowLeft, Key::ArrowRight),
            Orientation::Vertical => (Key::ArrowUp, Key::ArrowDown),
        };
        let last = self.items.len() - 1;

        match event.key {
            k if k == backward => {
                let to = match self.index {
                    0 if self.config.loop_focus => last,
                    0 => 0,
                    i => i - 1,
                };
                self.move_to(to)
            }
            k if k == forward => {
                let to = if self.index >= last {
                    if self.config.loop_focus {
                        0
                    } else {
                        last
                    }
                } else {
                    self.index + 1
                };
                self.move_to(to)
            }
            Key::Home if self.config.home_end => self.move_to(0),
            Key::End if self.config.home_end => self.move_to(last),
            Key::Enter | Key::Space => {
                if let (Some(handler), Some(item)) = (&self.on_activate, self.items.get(self.index)) {
                    handler(item, self.index);
                }
                KeyAction::Activated(self.index)
            }
            Key::Escape if self.config.escape_enabled => {
                if let Some(handler) = &self.on_escape {
                    handler();
                }
                KeyAction::Escaped
            }
            _ => KeyAction::Ignored,
        }
    }

    fn move_to(&mut self, to: usize) -> KeyAction {
        let from = self.index;
        self.index = to;
        KeyAction::Moved { from, to }
    }

    fn type_ahead(&mut self, c: char, now: Duration) -> KeyAction {
        self.buffer.extend(c.to_lowercase());
        self.last_input = Some(now);
        self.state = KeyboardState::TypeAhead;

        // "aaa" cycles through items starting with "a"
        let mut chars = self.buffer.chars();
        let needle: String = match chars.next() {
            Some(first) if chars.all(|c| c == first) => first.to_string(),
            _ => self.buffer.clone(),
        };

        let len = self.items.len();
        let found = (1..=len)
            .map(|step| (self.index + step) % len)
            .find(|&i| self.items[i].label().to_lowercase().starts_with(&needle));

        if let Some(to) = found {
            tracing::trace!("KeyboardNavigator: type-ahead `{}` -> {}", needle, to);
            self.index = to;
        }
        KeyAction::TypeAhead { to: found }
    }

    /// Drop any pending type-ahead run, keeping focus where it is
    pub fn reset_type_ahead(&mut self) {
        self.clear_buffer();
    }

    fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.last_input = None;
        self.state = KeyboardState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn nav(config: KeyboardConfig, labels: &[&'static str]) -> KeyboardNavigator<&'static str> {
        KeyboardNavigator::new(config, labels.to_vec())
    }

    fn press(nav: &mut KeyboardNavigator<&'static str>, key: Key, at: u64) -> KeyAction {
        nav.handle_key(KeyEvent::new(key), ms(at))
    }

    #[test]
    fn test_forward_wraps_when_looping() {
        let mut nav = nav(KeyboardConfig::default(), &["One", "Two", "Three"]);
        nav.set_index(2);
        assert_eq!(
            press(&mut nav, Key::ArrowDown, 0),
            KeyAction::Moved { from: 2, to: 0 }
        );
        assert_eq!(
            press(&mut nav, Key::ArrowUp, 0),
            KeyAction::Moved { from: 0, to: 2 }
        );
    }

    #[test]
    fn test_forward_clamps_without_loop() {
        let mut nav = nav(KeyboardConfig::overlay(), &["One", "Two", "Three"]);
        nav.set_index(2);
        assert_eq!(
            press(&mut nav, Key::ArrowDown, 0),
            KeyAction::Moved { from: 2, to: 2 }
        );
        nav.set_index(0);
        press(&mut nav, Key::ArrowUp, 0);
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_orientation_selects_axis_keys() {
        let mut nav = nav(KeyboardConfig::tabs(), &["One", "Two"]);
        assert_eq!(press(&mut nav, Key::ArrowDown, 0), KeyAction::Ignored);
        assert_eq!(
            press(&mut nav, Key::ArrowRight, 0),
            KeyAction::Moved { from: 0, to: 1 }
        );
        assert_eq!(nav.item_role(), AriaRole::Tab);
        assert_eq!(nav.list_role(), AriaRole::TabList);
    }

    #[test]
    fn test_home_end() {
        let mut nav = nav(KeyboardConfig::default(), &["One", "Two", "Three"]);
        press(&mut nav, Key::End, 0);
        assert_eq!(nav.index(), 2);
        press(&mut nav, Key::Home, 0);
        assert_eq!(nav.index(), 0);

        let mut disabled = nav_with_home_end_off();
        assert_eq!(press(&mut disabled, Key::End, 0), KeyAction::Ignored);
    }

    fn nav_with_home_end_off() -> KeyboardNavigator<&'static str> {
        nav(
            KeyboardConfig {
                home_end: false,
                ..Default::default()
            },
            &["One", "Two"],
        )
    }

    #[test]
    fn test_type_ahead_repeated_char_cycles() {
        let mut nav = nav(KeyboardConfig::default(), &["Alpha", "Apple", "Banana"]);
        nav.set_index(2);
        assert_eq!(
            press(&mut nav, Key::Char('a'), 0),
            KeyAction::TypeAhead { to: Some(0) }
        );
        assert_eq!(
            press(&mut nav, Key::Char('a'), 100),
            KeyAction::TypeAhead { to: Some(1) }
        );
        assert_eq!(nav.state(), KeyboardState::TypeAhead);
    }

    #[test]
    fn test_type_ahead_prefix_and_case() {
        let mut nav = nav(KeyboardConfig::default(), &["Alpha", "Apple", "Banana"]);
        nav.set_index(2);
        press(&mut nav, Key::Char('A'), 0);
        press(&mut nav, Key::Char('p'), 100);
        assert_eq!(nav.buffer(), "ap");
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn test_type_ahead_times_out() {
        let mut nav = nav(KeyboardConfig::default(), &["Alpha", "Banana", "Bravo"]);
        press(&mut nav, Key::Char('b'), 0);
        assert_eq!(nav.index(), 1);
        // 600ms later the buffer starts over: "r" alone matches nothing
        assert_eq!(
            press(&mut nav, Key::Char('r'), 600),
            KeyAction::TypeAhead { to: None }
        );
        assert_eq!(nav.buffer(), "r");
        assert_eq!(nav.index(), 1);

        nav.expire(ms(1200));
        assert_eq!(nav.state(), KeyboardState::Idle);
        assert!(nav.buffer().is_empty());
    }

    #[test]
    fn test_reset_type_ahead() {
        let mut nav = nav(KeyboardConfig::default(), &["Alpha", "Banana"]);
        press(&mut nav, Key::Char('b'), 0);
        assert!(nav.type_ahead_deadline().is_some());

        nav.reset_type_ahead();
        assert!(nav.buffer().is_empty());
        assert_eq!(nav.type_ahead_deadline(), None);
        assert_eq!(nav.state(), KeyboardState::Idle);
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn test_non_printable_key_clears_buffer() {
        let mut nav = nav(KeyboardConfig::default(), &["Alpha", "Banana"]);
        press(&mut nav, Key::Char('b'), 0);
        press(&mut nav, Key::ArrowUp, 10);
        assert_eq!(nav.state(), KeyboardState::Idle);
        assert!(nav.buffer().is_empty());
    }

    #[test]
    fn test_modified_char_is_not_type_ahead() {
        let mut nav = nav(KeyboardConfig::default(), &["Alpha", "Banana"]);
        let event = KeyEvent::new(Key::Char('b')).with_modifiers(sightline_core::Modifiers {
            ctrl: true,
            ..Default::default()
        });
        assert_eq!(nav.handle_key(event, ms(0)), KeyAction::Ignored);
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_activate_and_escape_handlers() {
        let activated = Arc::new(AtomicUsize::new(usize::MAX));
        let escaped = Arc::new(AtomicUsize::new(0));
        let (a, e) = (activated.clone(), escaped.clone());

        let mut nav = nav(KeyboardConfig::overlay(), &["One", "Two"])
            .on_activate(move |_, i| a.store(i, Ordering::SeqCst))
            .on_escape(move || {
                e.fetch_add(1, Ordering::SeqCst);
            });

        press(&mut nav, Key::ArrowDown, 0);
        assert_eq!(press(&mut nav, Key::Char(' '), 0), KeyAction::Activated(1));
        assert_eq!(activated.load(Ordering::SeqCst), 1);

        assert_eq!(press(&mut nav, Key::Escape, 0), KeyAction::Escaped);
        assert_eq!(escaped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_escape_ignored_unless_enabled() {
        let mut nav = nav(KeyboardConfig::default(), &["One"]);
        assert_eq!(press(&mut nav, Key::Escape, 0), KeyAction::Ignored);
        assert!(!KeyAction::Ignored.is_handled());
    }

    #[test]
    fn test_item_props_roving_tab_index() {
        let mut nav = nav(KeyboardConfig::default(), &["One", "Two", "Three"]);
        nav.set_index(1);
        assert_eq!(nav.item_props(1).tab_index, 0);
        assert!(nav.item_props(1).selected);
        assert_eq!(nav.item_props(0).tab_index, -1);
        assert_eq!(nav.item_props(2).role, AriaRole::MenuItem);
    }

    #[test]
    fn test_set_items_resets_on_identity_change() {
        let mut nav = nav(KeyboardConfig::default(), &["One", "Two", "Three"]);
        nav.set_index(2);
        assert!(!nav.set_items(vec!["One", "Two", "Three"]));
        assert_eq!(nav.index(), 2);
        assert!(nav.set_items(vec!["Three", "Two", "One"]));
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_empty_list_ignores_everything() {
        let mut nav = nav(KeyboardConfig::default(), &[]);
        assert_eq!(press(&mut nav, Key::ArrowDown, 0), KeyAction::Ignored);
        assert_eq!(press(&mut nav, Key::Enter, 0), KeyAction::Ignored);
        assert!(!nav.set_index(0));
    }
}
