//! Events, event classes and the edge-key classifier.
//!
//! Edges are keyed in one of two ways:
//!
//! - **Exact**: the incoming event must equal the key. This is how
//!   enumerated event kinds (`Coin`, `Turn`) are matched.
//! - **Class**: the incoming event must be an instance of a declared
//!   [`EventClass`], or of a class extending it. Classes form a static
//!   hierarchy of stable tags, so matching never needs runtime reflection.

use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

/// Stable type tag for polymorphic event matching.
///
/// Classes are declared as constants. A class may extend a parent, and an
/// event of class `Run` is then also an instance of every ancestor of `Run`.
///
/// # Example
///
/// ```rust
/// use switchyard::core::EventClass;
///
/// const TYPE_EVENT: EventClass = EventClass::root("TypeEvent");
/// const RUN: EventClass = EventClass::extends("Run", &TYPE_EVENT);
///
/// assert!(RUN.is_a(&TYPE_EVENT));
/// assert!(RUN.is_a(&RUN));
/// assert!(!TYPE_EVENT.is_a(&RUN));
/// ```
#[derive(Clone, Copy)]
pub struct EventClass {
    tag: &'static str,
    parent: Option<&'static EventClass>,
}

impl EventClass {
    /// A class with no parent.
    pub const fn root(tag: &'static str) -> Self {
        Self { tag, parent: None }
    }

    /// A class extending `parent`.
    pub const fn extends(tag: &'static str, parent: &'static EventClass) -> Self {
        Self {
            tag,
            parent: Some(parent),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn parent(&self) -> Option<&'static EventClass> {
        self.parent
    }

    /// True if `self` is `other` or extends it, directly or transitively.
    pub fn is_a(&self, other: &EventClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.tag == other.tag {
                return true;
            }
            current = class.parent;
        }
        false
    }
}

impl PartialEq for EventClass {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for EventClass {}

impl Hash for EventClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
    }
}

impl Debug for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) => write!(f, "{} < {:?}", self.tag, parent),
            None => f.write_str(self.tag),
        }
    }
}

/// Trait for events presented to a state machine.
///
/// Enumerated events keep the default [`Event::class`] of `None` and are
/// matched by equality only. Polymorphic events report the most specific
/// class they are an instance of.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{Event, EventClass};
///
/// const TYPE_EVENT: EventClass = EventClass::root("TypeEvent");
/// const RUN: EventClass = EventClass::extends("Run", &TYPE_EVENT);
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum TypeEvent {
///     Run(u32),
/// }
///
/// impl Event for TypeEvent {
///     fn class(&self) -> Option<EventClass> {
///         match self {
///             Self::Run(_) => Some(RUN),
///         }
///     }
/// }
///
/// assert_eq!(TypeEvent::Run(1).class(), Some(RUN));
/// ```
pub trait Event: Clone + Eq + Hash + Debug + Send + Sync {
    /// The declared class this event is matched against, if any.
    fn class(&self) -> Option<EventClass> {
        None
    }
}

/// Key under which an edge is registered on a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKey<E> {
    /// Matches events equal to the wrapped value.
    Exact(E),
    /// Matches events whose class is, or extends, the wrapped class.
    Class(EventClass),
}

impl<E: Event> EventKey<E> {
    /// Decide whether `event` is matched by this key.
    pub fn matches(&self, event: &E) -> bool {
        match self {
            Self::Exact(expected) => expected == event,
            Self::Class(class) => event.class().is_some_and(|actual| actual.is_a(class)),
        }
    }
}

impl<E: Event> From<E> for EventKey<E> {
    fn from(event: E) -> Self {
        Self::Exact(event)
    }
}
