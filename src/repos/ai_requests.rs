use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use models::authorization::*;
use models::{AiDiscountRequest, NewAiDiscountRequest, Organization, OrganizationId, UserId};
use repos::acl;
use repos::legacy_acl::{Acl, CheckScope};
use repos::types::RepoResult;
use schema::ai_discount_requests::dsl as AiRequests;
use schema::organizations::dsl as Organizations;

/// AI discount requests repository, the log of discounts agents asked for
pub struct AiDiscountRequestsRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
    pub acl: Box<Acl<Resource, Action, Scope, FailureError, AiDiscountRequest>>,
}

pub trait AiDiscountRequestsRepo {
    /// Creates new AI discount request record
    fn create(&self, payload: NewAiDiscountRequest) -> RepoResult<AiDiscountRequest>;

    /// All requests of one organization, newest first
    fn find_by_organization(&self, organization_id_arg: OrganizationId) -> RepoResult<Vec<AiDiscountRequest>>;
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> AiDiscountRequestsRepoImpl<'a, T> {
    pub fn new(db_conn: &'a T, acl: Box<Acl<Resource, Action, Scope, FailureError, AiDiscountRequest>>) -> Self {
        Self { db_conn, acl }
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> AiDiscountRequestsRepo
    for AiDiscountRequestsRepoImpl<'a, T>
{
    /// Creates new AI discount request record
    fn create(&self, payload: NewAiDiscountRequest) -> RepoResult<AiDiscountRequest> {
        debug!("Create new AI discount request {:?}.", payload);

        let query = diesel::insert_into(AiRequests::ai_discount_requests).values(&payload);
        query
            .get_result::<AiDiscountRequest>(self.db_conn)
            .map_err(From::from)
            .and_then(|value| {
                acl::check(&*self.acl, Resource::AiDiscountRequests, Action::Create, self, Some(&value))?;

                Ok(value)
            }).map_err(|e: FailureError| {
                e.context(format!("Creates new AI discount request: {:?} error occurred", payload))
                    .into()
            })
    }

    /// All requests of one organization, newest first
    fn find_by_organization(&self, organization_id_arg: OrganizationId) -> RepoResult<Vec<AiDiscountRequest>> {
        debug!("Get AI discount requests of organization {}.", organization_id_arg);

        let query = AiRequests::ai_discount_requests
            .filter(AiRequests::organization_id.eq(organization_id_arg))
            .order(AiRequests::created_at.desc());

        query
            .get_results(self.db_conn)
            .map_err(From::from)
            .and_then(|values: Vec<AiDiscountRequest>| {
                for value in &values {
                    acl::check(&*self.acl, Resource::AiDiscountRequests, Action::Read, self, Some(&value))?;
                }

                Ok(values)
            }).map_err(|e: FailureError| {
                e.context(format!(
                    "Get AI discount requests of organization {} error occurred",
                    organization_id_arg
                )).into()
            })
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> CheckScope<Scope, AiDiscountRequest>
    for AiDiscountRequestsRepoImpl<'a, T>
{
    fn is_in_scope(&self, user_id: UserId, scope: &Scope, obj: Option<&AiDiscountRequest>) -> bool {
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
