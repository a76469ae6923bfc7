//! Users.

use serde::{Deserialize, Serialize};

use crate::{PlatformUserId, RowId};

/// An aquarium owner, keyed by the platform account it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RowId,
    pub platform_user_id: PlatformUserId,
    pub username: Option<String>,
    pub created_at: u64,
}
