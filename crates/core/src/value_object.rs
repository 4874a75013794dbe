//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are immutable: two instances holding the
/// same values are interchangeable. Constructors are where validation happens,
/// so a value object that exists is always valid.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct AccountNumber(String);
///
/// impl ValueObject for AccountNumber {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
