//! Who may change what.
//!
//! Authorization is expressed once, against the [`Owned`] trait, instead of
//! comparing author fields inline in every service.

use crate::api::HandlerError;
use crate::entities::Role;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A resource with a single owning user.
pub trait Owned {
    /// Human-readable resource name used in error messages.
    const RESOURCE: &'static str;

    /// Whether administrators may edit or delete resources of this type
    /// they do not own.
    const ADMIN_MODERATED: bool = false;

    fn owner_id(&self) -> &str;
}

/// Can `actor` mutate `resource`?
pub fn can_mutate<T: Owned>(actor: &Actor, resource: &T) -> bool {
    resource.owner_id() == actor.id || (T::ADMIN_MODERATED && actor.is_admin())
}

pub fn ensure_can_mutate<T: Owned>(actor: &Actor, resource: &T) -> Result<(), HandlerError> {
    if can_mutate(actor, resource) {
        Ok(())
    } else {
        Err(HandlerError::Forbidden(format!(
            "you do not have permission to modify this {}",
            T::RESOURCE
        )))
    }
}

pub fn ensure_admin(actor: &Actor) -> Result<(), HandlerError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(HandlerError::Forbidden("administrator role required".into()))
    }
}
