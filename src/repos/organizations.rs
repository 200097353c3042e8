use std::time::SystemTime;

use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use models::authorization::*;
use models::{CouponCode, Organization, OrganizationId, OrganizationStatus, SubscriptionStatus, UserId};
use repos::acl;
use repos::legacy_acl::{Acl, CheckScope};
use repos::types::RepoResult;
use schema::organizations::dsl as Organizations;

/// Organizations repository. The coupon engine reads tenants and flips them
/// to internal status when a free-forever coupon is redeemed.
pub struct OrganizationsRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
    pub acl: Box<Acl<Resource, Action, Scope, FailureError, Organization>>,
}

pub trait OrganizationsRepo {
    /// Get organization
    fn get(&self, id_arg: OrganizationId) -> RepoResult<Option<Organization>>;

    /// Activate the organization through a free-forever platform coupon:
    /// internal status, active subscription, no payment provider linkage.
    fn activate_free_forever(&self, id_arg: OrganizationId, coupon_code_arg: CouponCode) -> RepoResult<Organization>;
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> OrganizationsRepoImpl<'a, T> {
    pub fn new(db_conn: &'a T, acl: Box<Acl<Resource, Action, Scope, FailureError, Organization>>) -> Self {
        Self { db_conn, acl }
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> OrganizationsRepo
    for OrganizationsRepoImpl<'a, T>
{
    /// Get organization
    fn get(&self, id_arg: OrganizationId) -> RepoResult<Option<Organization>> {
        debug!("Find in organization with id {}.", id_arg);
        let query = Organizations::organizations.filter(Organizations::id.eq(&id_arg));
        query
            .get_result(self.db_conn)
            .optional()
            .map_err(From::from)
            .and_then(|value: Option<Organization>| {
                if let Some(value) = value.as_ref() {
                    acl::check(&*self.acl, Resource::Organizations, Action::Read, self, Some(value))?;
                };

                Ok(value)
            }).map_err(|e: FailureError| e.context(format!("Find organization by id: {} error occurred", id_arg)).into())
    }

    /// Activate the organization through a free-forever platform coupon.
    fn activate_free_forever(&self, id_arg: OrganizationId, coupon_code_arg: CouponCode) -> RepoResult<Organization> {
        debug!(
            "Activate organization {} as free forever with coupon {}.",
            id_arg, coupon_code_arg
        );

        let query = Organizations::organizations.find(&id_arg);
        query
            .get_result(self.db_conn)
            .map_err(From::from)
            .and_then(|value| acl::check(&*self.acl, Resource::Organizations, Action::Update, self, Some(&value)))
            .and_then(|_| {
                let filtered = Organizations::organizations.filter(Organizations::id.eq(&id_arg));
                let query = diesel::update(filtered).set((
                    Organizations::status.eq(OrganizationStatus::ActiveInternal),
                    Organizations::subscription_status.eq(SubscriptionStatus::Active),
                    Organizations::is_internal.eq(true),
                    Organizations::activated_with_coupon.eq(&coupon_code_arg),
                    Organizations::activated_at.eq(SystemTime::now()),
                    Organizations::stripe_customer_id.eq(None::<String>),
                    Organizations::stripe_subscription_id.eq(None::<String>),
                ));

                query.get_result::<Organization>(self.db_conn).map_err(From::from)
            }).map_err(|e: FailureError| {
                e.context(format!(
                    "Activate organization {} as free forever with coupon {} error occurred",
                    id_arg, coupon_code_arg
                )).into()
            })
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> CheckScope<Scope, Organization>
    for OrganizationsRepoImpl<'a, T>
{
    fn is_in_scope(&self, user_id: UserId, scope: &Scope, obj: Option<&Organization>) -> bool {
        match *scope {
            Scope::All => true,
            Scope::Owned => {
                if let Some(organization) = obj {
                    organization.owner_id == user_id
                } else {
                    false
                }
            }
        }
    }
}
