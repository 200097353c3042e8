use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::sql_types::Bool;
use diesel::Connection;
use failure::Error as FailureError;

use models::authorization::*;
use models::{CouponId, CouponScope, CustomerId, NewRedemption, Organization, OrganizationId, Redemption, UserId};
use repos::acl;
use repos::legacy_acl::{Acl, CheckScope};
use repos::types::RepoResult;
use schema::coupon_redemptions::dsl as Redemptions;
use schema::organizations::dsl as Organizations;

/// Search redemptions
#[derive(Clone, Debug)]
pub enum RedemptionSearch {
    Organization(OrganizationId),
    Coupon(CouponId, CouponScope),
}

/// Redemptions repository, the audit trail of applied coupons
pub struct RedemptionsRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
    pub acl: Box<Acl<Resource, Action, Scope, FailureError, Redemption>>,
}

pub trait RedemptionsRepo {
    /// Creates new redemption record
    fn create(&self, payload: NewRedemption) -> RepoResult<Redemption>;

    /// Search redemptions
    fn find_by(&self, search: RedemptionSearch) -> RepoResult<Vec<Redemption>>;

    /// How many times a customer already redeemed a merchant coupon
    fn count_for_customer(&self, coupon_id_arg: CouponId, customer_id_arg: CustomerId) -> RepoResult<i64>;
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> RedemptionsRepoImpl<'a, T> {
    pub fn new(db_conn: &'a T, acl: Box<Acl<Resource, Action, Scope, FailureError, Redemption>>) -> Self {
        Self { db_conn, acl }
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> RedemptionsRepo
    for RedemptionsRepoImpl<'a, T>
{
    /// Creates new redemption record
    fn create(&self, payload: NewRedemption) -> RepoResult<Redemption> {
        debug!("Create new redemption {:?}.", payload);

        let query = diesel::insert_into(Redemptions::coupon_redemptions).values(&payload);
        query
            .get_result::<Redemption>(self.db_conn)
            .map_err(From::from)
            .and_then(|value| {
                acl::check(&*self.acl, Resource::Redemptions, Action::Create, self, Some(&value))?;

                Ok(value)
            }).map_err(|e: FailureError| e.context(format!("Creates new redemption: {:?} error occurred", payload)).into())
    }

    /// Search redemptions
    fn find_by(&self, search: RedemptionSearch) -> RepoResult<Vec<Redemption>> {
        debug!("Get redemptions by search: {:?}.", search);

        let search_exp: Box<BoxableExpression<Redemptions::coupon_redemptions, _, SqlType = Bool>> = match search {
            RedemptionSearch::Organization(value) => Box::new(Redemptions::organization_id.eq(value)),
            RedemptionSearch::Coupon(id, scope) => {
                Box::new(Redemptions::coupon_id.eq(id).and(Redemptions::coupon_scope.eq(scope)))
            }
        };

        let query = Redemptions::coupon_redemptions
            .filter(search_exp)
            .order(Redemptions::redeemed_at.desc());

        query
            .get_results(self.db_conn)
            .map_err(From::from)
            .and_then(|values: Vec<Redemption>| {
                for value in &values {
                    acl::check(&*self.acl, Resource::Redemptions, Action::Read, self, Some(&value))?;
                }

                Ok(values)
            }).map_err(|e: FailureError| e.context("Search redemptions failed.").into())
    }

    /// How many times a customer already redeemed a merchant coupon
    fn count_for_customer(&self, coupon_id_arg: CouponId, customer_id_arg: CustomerId) -> RepoResult<i64> {
        debug!(
            "Count redemptions of coupon {} by customer {}.",
            coupon_id_arg, customer_id_arg
        );

        let query = Redemptions::coupon_redemptions
            .filter(Redemptions::coupon_id.eq(coupon_id_arg))
            .filter(Redemptions::coupon_scope.eq(CouponScope::Merchant))
            .filter(Redemptions::customer_id.eq(customer_id_arg))
            .count();

        query.get_result::<i64>(self.db_conn).map_err(From::from).map_err(|e: FailureError| {
            e.context(format!(
                "Count redemptions of coupon {} by customer {} error occurred",
                coupon_id_arg, customer_id_arg
            )).into()
        })
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> CheckScope<Scope, Redemption>
    for RedemptionsRepoImpl<'a, T>
{
    fn is_in_scope(&self, user_id: UserId, scope: &Scope, obj: Option<&Redemption>) -> bool {
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
