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
use models::{
    CouponCode, CouponId, CouponStatus, MerchantCoupon, NewMerchantCoupon, Organization, OrganizationId, UpdateMerchantCoupon, UserId,
};
use repos::acl;
use repos::legacy_acl::{Acl, CheckScope};
use repos::types::RepoResult;
use schema::merchant_coupons::dsl as MerchantCoupons;
use schema::organizations::dsl as Organizations;

/// Search merchant coupons
#[derive(Clone, Debug)]
pub enum MerchantCouponSearch {
    Organization(OrganizationId),
    AiAuthorized(OrganizationId),
}

/// Merchant coupons repository, responsible for handling merchant coupons
pub struct MerchantCouponsRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
    pub acl: Box<Acl<Resource, Action, Scope, FailureError, MerchantCoupon>>,
}

pub trait MerchantCouponsRepo {
    /// Creates new coupon
    fn create(&self, payload: NewMerchantCoupon) -> RepoResult<MerchantCoupon>;

    /// Get coupon
    fn get(&self, id_arg: CouponId) -> RepoResult<Option<MerchantCoupon>>;

    /// Get coupon by code within organization
    fn get_by_code(&self, code_arg: CouponCode, organization_id_arg: OrganizationId) -> RepoResult<Option<MerchantCoupon>>;

    /// Search coupons
    fn find_by(&self, search: MerchantCouponSearch) -> RepoResult<Vec<MerchantCoupon>>;

    /// Update coupon
    fn update(&self, id_arg: CouponId, payload: UpdateMerchantCoupon) -> RepoResult<MerchantCoupon>;

    /// Atomically take one use of the coupon. Returns `false` when the
    /// usage cap is already reached.
    fn register_use(&self, id_arg: CouponId) -> RepoResult<bool>;
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> MerchantCouponsRepoImpl<'a, T> {
    pub fn new(db_conn: &'a T, acl: Box<Acl<Resource, Action, Scope, FailureError, MerchantCoupon>>) -> Self {
        Self { db_conn, acl }
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> MerchantCouponsRepo
    for MerchantCouponsRepoImpl<'a, T>
{
    /// Creates new coupon
    fn create(&self, payload: NewMerchantCoupon) -> RepoResult<MerchantCoupon> {
        debug!("Create new merchant coupon {:?}.", payload);
        let mut payload = payload;
        payload.code = payload.code.normalize();

        let query = diesel::insert_into(MerchantCoupons::merchant_coupons).values(&payload);
        query
            .get_result::<MerchantCoupon>(self.db_conn)
            .map_err(From::from)
            .and_then(|value| {
                acl::check(&*self.acl, Resource::MerchantCoupons, Action::Create, self, Some(&value))?;

                Ok(value)
            }).map_err(|e: FailureError| {
                e.context(format!("Creates new merchant coupon: {:?} error occurred", payload))
                    .into()
            })
    }

    /// Get coupon
    fn get(&self, id_arg: CouponId) -> RepoResult<Option<MerchantCoupon>> {
        debug!("Find in merchant coupon with id {}.", id_arg);
        let query = MerchantCoupons::merchant_coupons.filter(MerchantCoupons::id.eq(&id_arg));
        query
            .get_result(self.db_conn)
            .optional()
            .map_err(From::from)
            .and_then(|value: Option<MerchantCoupon>| {
                if let Some(value) = value.as_ref() {
                    acl::check(&*self.acl, Resource::MerchantCoupons, Action::Read, self, Some(value))?;
                };

                Ok(value)
            }).map_err(|e: FailureError| e.context(format!("Find merchant coupon by id: {} error occurred", id_arg)).into())
    }

    /// Get coupon by code within organization
    fn get_by_code(&self, code_arg: CouponCode, organization_id_arg: OrganizationId) -> RepoResult<Option<MerchantCoupon>> {
        let code_arg = code_arg.normalize();
        debug!(
            "Find in merchant coupon by code: {} and organization id: {}.",
            code_arg, organization_id_arg
        );
        let query = MerchantCoupons::merchant_coupons
            .filter(MerchantCoupons::code.eq(&code_arg))
            .filter(MerchantCoupons::organization_id.eq(organization_id_arg));
        query
            .get_result(self.db_conn)
            .optional()
            .map_err(From::from)
            .and_then(|value: Option<MerchantCoupon>| {
                if let Some(value) = value.as_ref() {
                    acl::check(&*self.acl, Resource::MerchantCoupons, Action::Read, self, Some(value))?;
                };

                Ok(value)
            }).map_err(|e: FailureError| {
                e.context(format!(
                    "Find merchant coupon by code: {} and organization id: {} error occurred",
                    code_arg, organization_id_arg
                )).into()
            })
    }

    /// Search coupons
    fn find_by(&self, search: MerchantCouponSearch) -> RepoResult<Vec<MerchantCoupon>> {
        debug!("Get merchant coupons by search: {:?}.", search);

        let search_exp: Box<BoxableExpression<MerchantCoupons::merchant_coupons, _, SqlType = Bool>> = match search {
            MerchantCouponSearch::Organization(value) => Box::new(MerchantCoupons::organization_id.eq(value)),
            // Agents are only ever offered live coupons
            MerchantCouponSearch::AiAuthorized(value) => Box::new(
                MerchantCoupons::organization_id
                    .eq(value)
                    .and(MerchantCoupons::ai_authorized.eq(true))
                    .and(MerchantCoupons::status.eq(CouponStatus::Active)),
            ),
        };

        let query = MerchantCoupons::merchant_coupons.filter(search_exp).order(MerchantCoupons::id);

        query
            .get_results(self.db_conn)
            .map_err(From::from)
            .and_then(|values: Vec<MerchantCoupon>| {
                for value in &values {
                    acl::check(&*self.acl, Resource::MerchantCoupons, Action::Read, self, Some(&value))?;
                }

                Ok(values)
            }).map_err(|e: FailureError| e.context("Search merchant coupons failed.").into())
    }

    /// Update coupon
    fn update(&self, id_arg: CouponId, payload: UpdateMerchantCoupon) -> RepoResult<MerchantCoupon> {
        debug!("Updating merchant coupon with id {} and payload {:?}.", id_arg, payload);
        let query = MerchantCoupons::merchant_coupons.find(&id_arg);

        query
            .get_result(self.db_conn)
            .map_err(From::from)
            .and_then(|value| acl::check(&*self.acl, Resource::MerchantCoupons, Action::Update, self, Some(&value)))
            .and_then(|_| {
                let filtered = MerchantCoupons::merchant_coupons.filter(MerchantCoupons::id.eq(&id_arg));
                let query = diesel::update(filtered).set(&payload);

                query.get_result::<MerchantCoupon>(self.db_conn).map_err(From::from)
            }).map_err(|e: FailureError| {
                e.context(format!(
                    "Updates specific merchant coupon: id: {}, payload: {:?}, error occurred",
                    id_arg, payload
                )).into()
            })
    }

    /// Atomically take one use of the coupon. The guard expression keeps the
    /// increment and the cap check in a single statement, so concurrent
    /// redemptions cannot oversell the coupon.
    fn register_use(&self, id_arg: CouponId) -> RepoResult<bool> {
        debug!("Register use of merchant coupon with id {}.", id_arg);

        let filtered = MerchantCoupons::merchant_coupons
            .filter(MerchantCoupons::id.eq(&id_arg))
            .filter(sql::<Bool>("max_uses IS NULL OR current_uses < max_uses"));
        let query = diesel::update(filtered).set(MerchantCoupons::current_uses.eq(MerchantCoupons::current_uses + 1));

        query
            .execute(self.db_conn)
            .map(|updated| updated > 0)
            .map_err(From::from)
            .map_err(|e: FailureError| {
                e.context(format!("Register use of merchant coupon: {} error occurred", id_arg))
                    .into()
            })
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> CheckScope<Scope, MerchantCoupon>
    for MerchantCouponsRepoImpl<'a, T>
{
    fn is_in_scope(&self, user_id: UserId, scope: &Scope, obj: Option<&MerchantCoupon>) -> bool {
        match *scope {
            Scope::All => true,
            Scope::Owned => {
                if let Some(value) = obj {
                    Organizations::organizations
                        .filter(Organizations::id.eq(&value.organization_id))
                        .get_result::<Organization>(self.db_conn)
                        .map(|org| org.owner_id == user_id)
                        .ok()
                        .unwrap_or(false)
                } else {
                    false
                }
            }
        }
    }
}
