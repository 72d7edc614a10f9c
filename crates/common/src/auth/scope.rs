//! OAuth scopes recognised by the Basalam platform.
//!
//! Scopes are open strings: the registry below lists the values the platform
//! documents, but any string is accepted wherever a scope is expected. A
//! [`Scope`] and a `&str` with the same value behave identically in every
//! scope query.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single OAuth scope value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Cow<'static, str>);

impl Scope {
    pub const ORDER_PROCESSING: Self = Self::known("order-processing");
    pub const VENDOR_PROFILE_READ: Self = Self::known("vendor.profile.read");
    pub const VENDOR_PROFILE_WRITE: Self = Self::known("vendor.profile.write");
    pub const CUSTOMER_PROFILE_READ: Self = Self::known("customer.profile.read");
    pub const CUSTOMER_PROFILE_WRITE: Self = Self::known("customer.profile.write");
    pub const VENDOR_PRODUCT_READ: Self = Self::known("vendor.product.read");
    pub const VENDOR_PRODUCT_WRITE: Self = Self::known("vendor.product.write");
    pub const CUSTOMER_ORDER_READ: Self = Self::known("customer.order.read");
    pub const CUSTOMER_ORDER_WRITE: Self = Self::known("customer.order.write");
    pub const VENDOR_PARCEL_READ: Self = Self::known("vendor.parcel.read");
    pub const VENDOR_PARCEL_WRITE: Self = Self::known("vendor.parcel.write");
    pub const CUSTOMER_WALLET_READ: Self = Self::known("customer.wallet.read");
    pub const CUSTOMER_WALLET_WRITE: Self = Self::known("customer.wallet.write");
    pub const CUSTOMER_CHAT_READ: Self = Self::known("customer.chat.read");
    pub const CUSTOMER_CHAT_WRITE: Self = Self::known("customer.chat.write");

    /// Wildcard requested by client-credentials clients that do not narrow
    /// their scope.
    pub const ALL: Self = Self::known("*");

    /// Every documented scope, in registry order.
    pub const KNOWN: &'static [Self] = &[
        Self::ORDER_PROCESSING,
        Self::VENDOR_PROFILE_READ,
        Self::VENDOR_PROFILE_WRITE,
        Self::CUSTOMER_PROFILE_READ,
        Self::CUSTOMER_PROFILE_WRITE,
        Self::VENDOR_PRODUCT_READ,
        Self::VENDOR_PRODUCT_WRITE,
        Self::CUSTOMER_ORDER_READ,
        Self::CUSTOMER_ORDER_WRITE,
        Self::VENDOR_PARCEL_READ,
        Self::VENDOR_PARCEL_WRITE,
        Self::CUSTOMER_WALLET_READ,
        Self::CUSTOMER_WALLET_WRITE,
        Self::CUSTOMER_CHAT_READ,
        Self::CUSTOMER_CHAT_WRITE,
    ];

    const fn known(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Wrap an arbitrary scope string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// Scope value as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this value appears in the documented registry.
    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.iter().any(|known| known == self)
    }

    /// Documented scopes belonging to `entity` (for example `vendor`).
    #[must_use]
    pub fn entity_scopes(entity: &str) -> Vec<Self> {
        let prefix = format!("{entity}.");
        Self::filter_known(|value| value.starts_with(&prefix))
    }

    /// Documented read-only scopes.
    #[must_use]
    pub fn read_scopes() -> Vec<Self> {
        Self::filter_known(|value| value.ends_with(".read"))
    }

    /// Documented write scopes.
    #[must_use]
    pub fn write_scopes() -> Vec<Self> {
        Self::filter_known(|value| value.ends_with(".write"))
    }

    /// Documented scopes for a feature such as `wallet` or `chat`.
    #[must_use]
    pub fn feature_scopes(feature: &str) -> Vec<Self> {
        let infix = format!(".{feature}.");
        Self::filter_known(|value| value.contains(&infix))
    }

    /// Join scopes into the space-separated form used by OAuth.
    pub fn join<I, S>(scopes: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        scopes.into_iter().map(|scope| scope.as_ref().to_string()).collect::<Vec<_>>().join(" ")
    }

    fn filter_known(predicate: impl Fn(&str) -> bool) -> Vec<Self> {
        Self::KNOWN.iter().filter(|scope| predicate(scope.as_str())).cloned().collect()
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Scope {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Scope {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_helpers() {
        let vendor = Scope::entity_scopes("vendor");
        assert_eq!(vendor.len(), 6);
        assert!(vendor.iter().all(|s| s.as_str().starts_with("vendor.")));

        assert_eq!(Scope::read_scopes().len(), 7);
        assert_eq!(Scope::write_scopes().len(), 7);

        let wallet = Scope::feature_scopes("wallet");
        assert_eq!(wallet, vec![Scope::CUSTOMER_WALLET_READ, Scope::CUSTOMER_WALLET_WRITE]);
        assert!(!Scope::read_scopes().contains(&Scope::ORDER_PROCESSING));
    }

    #[test]
    fn test_known_and_custom_scopes_compare_by_value() {
        let custom = Scope::new("vendor.profile.read");
        assert_eq!(custom, Scope::VENDOR_PROFILE_READ);
        assert!(custom.is_known());
        assert!(!Scope::new("x:read").is_known());
        assert_eq!(Scope::CUSTOMER_CHAT_READ, "customer.chat.read");
    }

    #[test]
    fn test_join_mixes_scope_and_str() {
        let joined = Scope::join([Scope::VENDOR_PRODUCT_READ.as_str(), "x:read"]);
        assert_eq!(joined, "vendor.product.read x:read");
        assert_eq!(Scope::join(Vec::<Scope>::new()), "");
    }

    #[test]
    fn test_serde_is_plain_string() {
        let json = serde_json::to_string(&Scope::ORDER_PROCESSING).unwrap();
        assert_eq!(json, "\"order-processing\"");
        let parsed: Scope = serde_json::from_str("\"customer.order.read\"").unwrap();
        assert_eq!(parsed, Scope::CUSTOMER_ORDER_READ);
    }
}
