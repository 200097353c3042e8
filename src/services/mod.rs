//! Services is a core layer for the app business logic like
//! validation, authorization, etc.

pub mod ai;
pub mod coupons;
pub mod discount;
pub mod plans;
pub mod types;
pub mod user_roles;

pub use self::ai::*;
pub use self::coupons::*;
pub use self::plans::*;
pub use self::types::ServiceFuture;
pub use self::user_roles::*;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use failure::Fail;
use futures_cpupool::CpuPool;
use r2d2::{ManageConnection, Pool, PooledConnection};

use errors::Error;
use models::UserId;
use repos::ReposFactory;

/// Static context for all service operations: shared pools and the repo
/// factory. Cheap to clone.
pub struct StaticContext<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    pub db_pool: Pool<M>,
    pub cpu_pool: CpuPool,
    pub repo_factory: F,
}

impl<T, M, F> Clone for StaticContext<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    fn clone(&self) -> Self {
        Self {
            db_pool: self.db_pool.clone(),
            cpu_pool: self.cpu_pool.clone(),
            repo_factory: self.repo_factory.clone(),
        }
    }
}

impl<T, M, F> StaticContext<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    pub fn new(db_pool: Pool<M>, cpu_pool: CpuPool, repo_factory: F) -> Self {
        Self {
            db_pool,
            cpu_pool,
            repo_factory,
        }
    }
}

/// Per request context: the authenticated caller, if any.
#[derive(Clone, Debug, Default)]
pub struct DynamicContext {
    pub user_id: Option<UserId>,
}

impl DynamicContext {
    pub fn new(user_id: Option<UserId>) -> Self {
        Self { user_id }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Service binds together static and dynamic context; all service traits
/// are implemented on it.
pub struct Service<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    pub static_context: StaticContext<T, M, F>,
    pub dynamic_context: DynamicContext,
}

impl<T, M, F> Clone for Service<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    fn clone(&self) -> Self {
        Self {
            static_context: self.static_context.clone(),
            dynamic_context: self.dynamic_context.clone(),
        }
    }
}

impl<T, M, F> Service<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    pub fn new(static_context: StaticContext<T, M, F>, dynamic_context: DynamicContext) -> Self {
        Self {
            static_context,
            dynamic_context,
        }
    }

    /// Runs blocking repo work on the CPU pool with a connection taken from
    /// the DB pool.
    pub fn spawn_on_pool<R, Func>(&self, f: Func) -> ServiceFuture<R>
    where
        R: Send + 'static,
        Func: FnOnce(PooledConnection<M>) -> Result<R, FailureError> + Send + 'static,
    {
        let db_pool = self.static_context.db_pool.clone();
        let cpu_pool = self.static_context.cpu_pool.clone();
        Box::new(cpu_pool.spawn_fn(move || db_pool.get().map_err(|e| e.context(Error::Connection).into()).and_then(f)))
    }
}
