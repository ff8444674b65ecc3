//! Capability flags for channel schemas.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A feature a channel schema may declare support for.
///
/// Each capability owns a stable bit value. The bits are persisted and
/// transmitted, so they must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Send outbound messages.
    SendMessages,

    /// Receive inbound messages.
    ReceiveMessages,

    /// Query the delivery status of a previously sent message.
    MessageStatusQuery,

    /// React to provider-side message state changes (delivered, read, failed).
    HandleMessageState,

    /// Submit many messages in a single batch call.
    BulkMessaging,

    /// Send provider-registered message templates.
    Templates,

    /// Attach media to messages.
    MediaAttachments,

    /// Probe connection health.
    HealthCheck,
}

impl Capability {
    /// All capabilities, in bit order.
    pub const ALL: [Capability; 8] = [
        Capability::SendMessages,
        Capability::ReceiveMessages,
        Capability::MessageStatusQuery,
        Capability::HandleMessageState,
        Capability::BulkMessaging,
        Capability::Templates,
        Capability::MediaAttachments,
        Capability::HealthCheck,
    ];

    /// The stable bit assigned to this capability.
    pub const fn bit(self) -> u32 {
        match self {
            Capability::SendMessages => 1 << 0,
            Capability::ReceiveMessages => 1 << 1,
            Capability::MessageStatusQuery => 1 << 2,
            Capability::HandleMessageState => 1 << 3,
            Capability::BulkMessaging => 1 << 4,
            Capability::Templates => 1 << 5,
            Capability::MediaAttachments => 1 << 6,
            Capability::HealthCheck => 1 << 7,
        }
    }

    /// Capability name as it appears in validation messages.
    pub const fn name(self) -> &'static str {
        match self {
            Capability::SendMessages => "SendMessages",
            Capability::ReceiveMessages => "ReceiveMessages",
            Capability::MessageStatusQuery => "MessageStatusQuery",
            Capability::HandleMessageState => "HandleMessageState",
            Capability::BulkMessaging => "BulkMessaging",
            Capability::Templates => "Templates",
            Capability::MediaAttachments => "MediaAttachments",
            Capability::HealthCheck => "HealthCheck",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable set of [`Capability`] flags backed by a bitmask.
///
/// Supports union (`|`, `|=`), containment tests, and set difference.
/// Serializes as a list of capability names.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u32);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    /// Create an empty set.
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Whether the set contains the given capability.
    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Whether every capability in `other` is also in this set.
    pub fn contains_all(self, other: CapabilitySet) -> bool {
        self.0 & other.0 == other.0
    }

    /// A copy of the set with `capability` added.
    pub fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    /// A copy of the set with `capability` removed.
    pub fn without(self, capability: Capability) -> Self {
        Self(self.0 & !capability.bit())
    }

    /// The union of two sets.
    pub fn union(self, other: CapabilitySet) -> Self {
        Self(self.0 | other.0)
    }

    /// Capabilities present in this set but not in `other`.
    pub fn difference(self, other: CapabilitySet) -> Self {
        Self(self.0 & !other.0)
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of capabilities in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the capabilities in the set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .iter()
            .copied()
            .filter(move |c| self.contains(*c))
    }
}

impl From<Capability> for CapabilitySet {
    fn from(capability: Capability) -> Self {
        CapabilitySet(capability.bit())
    }
}

impl BitOr for Capability {
    type Output = CapabilitySet;

    fn bitor(self, rhs: Capability) -> CapabilitySet {
        CapabilitySet(self.bit() | rhs.bit())
    }
}

impl BitOr<Capability> for CapabilitySet {
    type Output = CapabilitySet;

    fn bitor(self, rhs: Capability) -> CapabilitySet {
        self.with(rhs)
    }
}

impl BitOr for CapabilitySet {
    type Output = CapabilitySet;

    fn bitor(self, rhs: CapabilitySet) -> CapabilitySet {
        self.union(rhs)
    }
}

impl BitOrAssign<Capability> for CapabilitySet {
    fn bitor_assign(&mut self, rhs: Capability) {
        self.0 |= rhs.bit();
    }
}

impl BitOrAssign for CapabilitySet {
    fn bitor_assign(&mut self, rhs: CapabilitySet) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CapabilitySet::EMPTY, CapabilitySet::with)
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilitySet({})", self)
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let mut first = true;
        for capability in self.iter() {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(capability.name())?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let capabilities = Vec::<Capability>::deserialize(deserializer)?;
        Ok(capabilities.into_iter().collect())
    }
}
