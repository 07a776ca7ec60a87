use uuid::Uuid;

use crate::value_objects::enums::user_roles::UserRole;

/// Authenticated caller identity handed down from the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: UserRole,
}
