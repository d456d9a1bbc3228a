//! Identifier newtypes.
//!
//! Partner organizations, partnerships, local users and partner-side users
//! all use numeric identifiers issued by different systems. Wrapping them
//! keeps a partner id from being passed where a partnership id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Identity of a partner organization. Survives partnership deletion.
    PartnerId
);

numeric_id!(
    /// Identity of one partnership between the local organization and a partner.
    PartnershipId
);

numeric_id!(
    /// A user of the local organization.
    LocalUserId
);

numeric_id!(
    /// A user of the partner organization.
    PartnerUserId
);

numeric_id!(
    /// A department of the partner organization.
    DepartmentId
);
