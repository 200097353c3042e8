//! UserRoles Services, presents CRUD operations with user_roles

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use r2d2::ManageConnection;

use models::{NewUserRole, Role, UserId, UserRole};
use repos::ReposFactory;
use services::types::ServiceFuture;
use services::Service;

pub trait UserRolesService {
    /// Returns roles by user id
    fn get_roles(&self, user_id: UserId) -> ServiceFuture<Vec<Role>>;
    /// Creates new user role
    fn create_user_role(&self, payload: NewUserRole) -> ServiceFuture<UserRole>;
    /// Deletes roles by user id
    fn delete_user_role_by_user_id(&self, user_id_arg: UserId) -> ServiceFuture<Vec<UserRole>>;
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > UserRolesService for Service<T, M, F>
{
    /// Returns roles by user id
    fn get_roles(&self, user_id: UserId) -> ServiceFuture<Vec<Role>> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let user_roles_repo = repo_factory.create_user_roles_repo_with_sys_acl(&*conn);
            user_roles_repo
                .list_for_user(user_id)
                .map_err(|e: FailureError| e.context("Service user_roles, get_roles endpoint error occurred.").into())
        })
    }

    /// Creates new user role
    fn create_user_role(&self, new_user_role: NewUserRole) -> ServiceFuture<UserRole> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let user_roles_repo = repo_factory.create_user_roles_repo_with_sys_acl(&*conn);
            conn.transaction::<UserRole, FailureError, _>(move || user_roles_repo.create(new_user_role))
                .map_err(|e: FailureError| e.context("Service user_roles, create_user_role endpoint error occurred.").into())
        })
    }

    /// Deletes roles by user id
    fn delete_user_role_by_user_id(&self, user_id_arg: UserId) -> ServiceFuture<Vec<UserRole>> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let user_roles_repo = repo_factory.create_user_roles_repo_with_sys_acl(&*conn);
            conn.transaction::<Vec<UserRole>, FailureError, _>(move || user_roles_repo.delete_by_user_id(user_id_arg))
                .map_err(|e: FailureError| {
                    e.context("Service user_roles, delete_user_role_by_user_id endpoint error occurred.")
                        .into()
                })
        })
    }
}
