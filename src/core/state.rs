//! Core State trait for state machine states.
//!
//! A state value says where a machine is. It may be a plain tag or carry a
//! payload (coins collected, candies left). The state's name identifies the
//! graph node it lives on, so payload-carrying values are declared once per
//! name and matched by name at run time.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure. States are immutable values; transitions produce
/// new values rather than mutating the current one.
///
/// # Node identity
///
/// Builders deduplicate nodes by [`State::name`]: every value with the same
/// name resolves to the same node, whatever its payload. Values that compare
/// equal must therefore return the same name.
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Turnstile {
///     Locked { coins: u32 },
///     Unlocked { coins: u32 },
/// }
///
/// impl State for Turnstile {
///     fn name(&self) -> &str {
///         match self {
///             Self::Locked { .. } => "Locked",
///             Self::Unlocked { .. } => "Unlocked",
///         }
///     }
/// }
///
/// assert_eq!(Turnstile::Locked { coins: 3 }.name(), Turnstile::Locked { coins: 9 }.name());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name of the node this value belongs to.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
