use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::sql_types::Bool;
use diesel::Connection;
use failure::Error as FailureError;

use models::authorization::*;
use models::{CouponCode, CouponId, NewPlatformCoupon, PlatformCoupon, UserId};
use repos::acl;
use repos::legacy_acl::{Acl, CheckScope};
use repos::types::RepoResult;
use schema::platform_coupons::dsl as PlatformCoupons;

/// Platform coupons repository, responsible for handling subscription coupons
pub struct PlatformCouponsRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
    pub acl: Box<Acl<Resource, Action, Scope, FailureError, PlatformCoupon>>,
}

pub trait PlatformCouponsRepo {
    /// Creates new coupon
    fn create(&self, payload: NewPlatformCoupon) -> RepoResult<PlatformCoupon>;

    /// List all coupons
    fn list(&self) -> RepoResult<Vec<PlatformCoupon>>;

    /// Get coupon
    fn get(&self, id_arg: CouponId) -> RepoResult<Option<PlatformCoupon>>;

    /// Get coupon by code
    fn get_by_code(&self, code_arg: CouponCode) -> RepoResult<Option<PlatformCoupon>>;

    /// Atomically take one use of the coupon. Returns `false` when the
    /// usage cap is already reached.
    fn register_use(&self, id_arg: CouponId) -> RepoResult<bool>;
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> PlatformCouponsRepoImpl<'a, T> {
    pub fn new(db_conn: &'a T, acl: Box<Acl<Resource, Action, Scope, FailureError, PlatformCoupon>>) -> Self {
        Self { db_conn, acl }
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> PlatformCouponsRepo
    for PlatformCouponsRepoImpl<'a, T>
{
    /// Creates new coupon
    fn create(&self, payload: NewPlatformCoupon) -> RepoResult<PlatformCoupon> {
        debug!("Create new platform coupon {:?}.", payload);
        let mut payload = payload;
        payload.code = payload.code.normalize();

        let query = diesel::insert_into(PlatformCoupons::platform_coupons).values(&payload);
        query
            .get_result::<PlatformCoupon>(self.db_conn)
            .map_err(From::from)
            .and_then(|value| {
                acl::check(&*self.acl, Resource::PlatformCoupons, Action::Create, self, Some(&value))?;

                Ok(value)
            }).map_err(|e: FailureError| {
                e.context(format!("Creates new platform coupon: {:?} error occurred", payload))
                    .into()
            })
    }

    /// List all coupons
    fn list(&self) -> RepoResult<Vec<PlatformCoupon>> {
        debug!("Find all platform coupons.");
        let query = PlatformCoupons::platform_coupons.order(PlatformCoupons::id);

        query
            .get_results(self.db_conn)
            .map_err(From::from)
            .and_then(|values: Vec<PlatformCoupon>| {
                for value in &values {
                    acl::check(&*self.acl, Resource::PlatformCoupons, Action::Read, self, Some(&value))?;
                }

                Ok(values)
            }).map_err(|e: FailureError| e.context("List all platform coupons").into())
    }

    /// Get coupon
    fn get(&self, id_arg: CouponId) -> RepoResult<Option<PlatformCoupon>> {
        debug!("Find in platform coupon with id {}.", id_arg);
        let query = PlatformCoupons::platform_coupons.filter(PlatformCoupons::id.eq(&id_arg));
        query
            .get_result(self.db_conn)
            .optional()
            .map_err(From::from)
            .and_then(|value: Option<PlatformCoupon>| {
                if let Some(value) = value.as_ref() {
                    acl::check(&*self.acl, Resource::PlatformCoupons, Action::Read, self, Some(value))?;
                };

                Ok(value)
            }).map_err(|e: FailureError| e.context(format!("Find platform coupon by id: {} error occurred", id_arg)).into())
    }

    /// Get coupon by code
    fn get_by_code(&self, code_arg: CouponCode) -> RepoResult<Option<PlatformCoupon>> {
        let code_arg = code_arg.normalize();
        debug!("Find in platform coupon by code: {}.", code_arg);
        let query = PlatformCoupons::platform_coupons.filter(PlatformCoupons::code.eq(&code_arg));
        query
            .get_result(self.db_conn)
            .optional()
            .map_err(From::from)
            .and_then(|value: Option<PlatformCoupon>| {
                if let Some(value) = value.as_ref() {
                    acl::check(&*self.acl, Resource::PlatformCoupons, Action::Read, self, Some(value))?;
                };

                Ok(value)
            }).map_err(|e: FailureError| e.context(format!("Find platform coupon by code: {} error occurred", code_arg)).into())
    }

    /// Atomically take one use of the coupon.
    fn register_use(&self, id_arg: CouponId) -> RepoResult<bool> {
        debug!("Register use of platform coupon with id {}.", id_arg);

        let filtered = PlatformCoupons::platform_coupons
            .filter(PlatformCoupons::id.eq(&id_arg))
            .filter(sql::<Bool>("max_uses IS NULL OR current_uses < max_uses"));
        let query = diesel::update(filtered).set(PlatformCoupons::current_uses.eq(PlatformCoupons::current_uses + 1));

        query
            .execute(self.db_conn)
            .map(|updated| updated > 0)
            .map_err(From::from)
            .map_err(|e: FailureError| {
                e.context(format!("Register use of platform coupon: {} error occurred", id_arg))
                    .into()
            })
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> CheckScope<Scope, PlatformCoupon>
    for PlatformCouponsRepoImpl<'a, T>
{
    fn is_in_scope(&self, _user_id: UserId, scope: &Scope, _obj: Option<&PlatformCoupon>) -> bool {
        match *scope {
            Scope::All => true,
            // Platform coupons belong to the platform itself, no tenant
            // ever owns one.
            Scope::Owned => false,
        }
    }
}
