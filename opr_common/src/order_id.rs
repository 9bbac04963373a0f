use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

/// The key prefix that distinguishes order-state rows from every other record type sharing the
/// store's key space.
pub const ORDER_STATE_PREFIX: &str = "ORDER_STATE#";

//--------------------------------------        OrderId        -------------------------------------------------------
/// A lightweight wrapper around the plain order identifier as it appears in payment notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl<S: Into<String>> From<S> for OrderId {
    fn from(s: S) -> Self {
        Self(s.into())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     TaggedOrderId     -------------------------------------------------------
/// The composite-key form of an order identifier, as used by the order-state store.
///
/// Tagging is a pure, invertible function: [`TaggedOrderId::tag`] prepends [`ORDER_STATE_PREFIX`]
/// and [`TaggedOrderId::untag`] strips exactly one leading occurrence of it, so
/// `tag(x).untag() == x` holds for every order id, including ids that themselves start with the
/// prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct TaggedOrderId(String);

impl TaggedOrderId {
    pub fn tag(id: &OrderId) -> Self {
        Self(format!("{ORDER_STATE_PREFIX}{}", id.as_str()))
    }

    pub fn untag(&self) -> OrderId {
        OrderId::from(self.0.strip_prefix(ORDER_STATE_PREFIX).unwrap_or(&self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaggedOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Not a tagged order id: {0}")]
pub struct TagError(String);

/// Externally supplied key strings must carry the prefix. Values read back from the store are
/// decoded transparently and skip this check, since only [`TaggedOrderId::tag`] ever writes them.
impl TryFrom<String> for TaggedOrderId {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.starts_with(ORDER_STATE_PREFIX) {
            Ok(Self(value))
        } else {
            Err(TagError(value))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tag_untag_round_trip() {
        for id in ["A1", "oid-2024/100", "", "🚀", "order with spaces"] {
            let plain = OrderId::from(id);
            let tagged = TaggedOrderId::tag(&plain);
            assert_eq!(tagged.untag(), plain);
        }
    }

    #[test]
    fn tag_is_prefix_stable_for_pretagged_ids() {
        let plain = OrderId::from("ORDER_STATE#A1");
        let tagged = TaggedOrderId::tag(&plain);
        assert_eq!(tagged.as_str(), "ORDER_STATE#ORDER_STATE#A1");
        assert_eq!(tagged.untag(), plain);
    }

    #[test]
    fn try_from_requires_prefix() {
        assert!(TaggedOrderId::try_from("ORDER_STATE#A1".to_string()).is_ok());
        let err = TaggedOrderId::try_from("A1".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Not a tagged order id: A1");
    }

    #[test]
    fn display_omits_nothing() {
        let tagged = TaggedOrderId::tag(&OrderId::from("A1"));
        assert_eq!(tagged.to_string(), "ORDER_STATE#A1");
        assert_eq!(OrderId::from("A1").to_string(), "#A1");
    }
}
