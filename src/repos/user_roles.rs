use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use models::authorization::*;
use models::{NewUserRole, Role, UserId, UserRole};
use repos::acl;
use repos::legacy_acl::{Acl, CheckScope};
use repos::types::RepoResult;
use schema::user_roles::dsl as UserRoles;

/// UserRoles repository, responsible for handling user_roles
pub struct UserRolesRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
    pub acl: Box<Acl<Resource, Action, Scope, FailureError, UserRole>>,
}

pub trait UserRolesRepo {
    /// List all roles of a user
    fn list_for_user(&self, user_id_arg: UserId) -> RepoResult<Vec<Role>>;

    /// Create a new user role
    fn create(&self, payload: NewUserRole) -> RepoResult<UserRole>;

    /// Delete roles of a user
    fn delete_by_user_id(&self, user_id_arg: UserId) -> RepoResult<Vec<UserRole>>;
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> UserRolesRepoImpl<'a, T> {
    pub fn new(db_conn: &'a T, acl: Box<Acl<Resource, Action, Scope, FailureError, UserRole>>) -> Self {
        Self { db_conn, acl }
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> UserRolesRepo
    for UserRolesRepoImpl<'a, T>
{
    /// List all roles of a user
    fn list_for_user(&self, user_id_arg: UserId) -> RepoResult<Vec<Role>> {
        debug!("List roles for user {}.", user_id_arg);
        let query = UserRoles::user_roles.filter(UserRoles::user_id.eq(user_id_arg));
        query
            .get_results::<UserRole>(self.db_conn)
            .map(|user_roles| user_roles.into_iter().map(|user_role| user_role.name).collect())
            .map_err(From::from)
            .map_err(|e: FailureError| e.context(format!("List roles for user {} error occurred", user_id_arg)).into())
    }

    /// Create a new user role
    fn create(&self, payload: NewUserRole) -> RepoResult<UserRole> {
        debug!("Create user role {:?}.", payload);

        let query = diesel::insert_into(UserRoles::user_roles).values(&payload);
        query
            .get_result::<UserRole>(self.db_conn)
            .map_err(From::from)
            .and_then(|value| {
                acl::check(&*self.acl, Resource::UserRoles, Action::Create, self, Some(&value))?;

                Ok(value)
            }).map_err(|e: FailureError| e.context(format!("Create user role {:?} error occurred", payload)).into())
    }

    /// Delete roles of a user
    fn delete_by_user_id(&self, user_id_arg: UserId) -> RepoResult<Vec<UserRole>> {
        debug!("Delete roles of user {}.", user_id_arg);

        acl::check(&*self.acl, Resource::UserRoles, Action::Delete, self, None)?;

        let filtered = UserRoles::user_roles.filter(UserRoles::user_id.eq(user_id_arg));
        let query = diesel::delete(filtered);

        query
            .get_results(self.db_conn)
            .map_err(From::from)
            .map_err(|e: FailureError| e.context(format!("Delete roles of user {} error occurred", user_id_arg)).into())
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> CheckScope<Scope, UserRole>
    for UserRolesRepoImpl<'a, T>
{
    fn is_in_scope(&self, user_id: UserId, scope: &Scope, obj: Option<&UserRole>) -> bool {
        match *scope {
            Scope::All => true,
            Scope::Owned => {
                if let Some(user_role) = obj {
                    user_role.user_id == user_id
                } else {
                    false
                }
            }
        }
    }
}
