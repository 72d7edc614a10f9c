//! String conversions for unit-like domain enums
//!
//! # Example
//!
//! ```rust
//! use basalam_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ChatType {
//!     Private,
//!     Group,
//! }
//!
//! impl_domain_status_conversions!(ChatType {
//!     Private => "private",
//!     Group => "group",
//! });
//!
//! assert_eq!(ChatType::Group.to_string(), "group");
//! assert_eq!("PRIVATE".parse::<ChatType>().unwrap(), ChatType::Private);
//! ```

/// Implements `Display` and case-insensitive `FromStr` for a unit enum.
///
/// Each variant maps to one canonical lowercase label; parsing failures
/// name the enum and the rejected input.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let label = match self {
                    $(Self::$variant => $str,)+
                };
                f.pad(label)
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let lowered = s.trim().to_lowercase();
                $(if lowered == $str {
                    return Ok(Self::$variant);
                })+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
