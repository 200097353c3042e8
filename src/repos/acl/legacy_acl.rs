//! Contains traits for acl checking and basic ACLs that do not depend on
//! user roles.

use models::UserId;

/// Access control layer for repos. It tells who can do what and does not
/// have any knowledge of the object itself.
pub trait Acl<Resource, Action, Scope, Error, T> {
    /// Tells if a user with this ACL can do `action` on `resource`.
    /// `scope_checker` resolves whether a concrete object `obj` falls into
    /// the permission's scope.
    fn allows(
        &self,
        resource: Resource,
        action: Action,
        scope_checker: &CheckScope<Scope, T>,
        obj: Option<&T>,
    ) -> Result<bool, Error>;
}

/// Resolves scope membership for objects of type `W`. Implemented by repos,
/// which know how ownership is stored.
pub trait CheckScope<Scope, W> {
    fn is_in_scope(&self, user_id: UserId, scope: &Scope, obj: Option<&W>) -> bool;
}

/// SystemACL allows all manipulation with resources in all cases. Used by
/// the service layer itself when it acts on behalf of the system, e.g.
/// inside a redemption transaction.
#[derive(Clone, Debug, Default)]
pub struct SystemACL;

impl<Resource, Action, Scope, Error, T> Acl<Resource, Action, Scope, Error, T> for SystemACL {
    fn allows(
        &self,
        _resource: Resource,
        _action: Action,
        _scope_checker: &CheckScope<Scope, T>,
        _obj: Option<&T>,
    ) -> Result<bool, Error> {
        Ok(true)
    }
}
