//! Authenticated caller identity

use serde::Serialize;

/// Who is making a request, as established by the authorization resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Principal {
    Partner { partner_id: i32 },
    Admin { admin_id: String, role: String },
}

impl Principal {
    pub fn partner_id(&self) -> Option<i32> {
        match self {
            Self::Partner { partner_id } => Some(*partner_id),
            Self::Admin { .. } => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }
}
