use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use models::authorization::*;
use models::{NewPricingPlan, PlanId, PricingPlan, UpdatePricingPlan, UserId};
use repos::acl;
use repos::legacy_acl::{Acl, CheckScope};
use repos::types::RepoResult;
use schema::pricing_plans::dsl as PricingPlans;

/// Pricing plans repository
pub struct PricingPlansRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
    pub acl: Box<Acl<Resource, Action, Scope, FailureError, PricingPlan>>,
}

pub trait PricingPlansRepo {
    /// Creates new pricing plan
    fn create(&self, payload: NewPricingPlan) -> RepoResult<PricingPlan>;

    /// Get plan by its external identifier
    fn get_by_plan_id(&self, plan_id_arg: PlanId) -> RepoResult<Option<PricingPlan>>;

    /// List plans visible on the public pricing page
    fn list_public(&self) -> RepoResult<Vec<PricingPlan>>;

    /// Update pricing plan
    fn update(&self, plan_id_arg: PlanId, payload: UpdatePricingPlan) -> RepoResult<PricingPlan>;
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> PricingPlansRepoImpl<'a, T> {
    pub fn new(db_conn: &'a T, acl: Box<Acl<Resource, Action, Scope, FailureError, PricingPlan>>) -> Self {
        Self { db_conn, acl }
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> PricingPlansRepo
    for PricingPlansRepoImpl<'a, T>
{
    /// Creates new pricing plan
    fn create(&self, payload: NewPricingPlan) -> RepoResult<PricingPlan> {
        debug!("Create new pricing plan {:?}.", payload);

        acl::check(&*self.acl, Resource::PricingPlans, Action::Create, self, None)?;

        let query = diesel::insert_into(PricingPlans::pricing_plans).values(&payload);
        query
            .get_result::<PricingPlan>(self.db_conn)
            .map_err(From::from)
            .map_err(|e: FailureError| e.context(format!("Creates new pricing plan: {:?} error occurred", payload)).into())
    }

    /// Get plan by its external identifier
    fn get_by_plan_id(&self, plan_id_arg: PlanId) -> RepoResult<Option<PricingPlan>> {
        debug!("Find in pricing plan with plan id {}.", plan_id_arg);
        let query = PricingPlans::pricing_plans.filter(PricingPlans::plan_id.eq(&plan_id_arg));
        query
            .get_result(self.db_conn)
            .optional()
            .map_err(From::from)
            .and_then(|value: Option<PricingPlan>| {
                if let Some(value) = value.as_ref() {
                    acl::check(&*self.acl, Resource::PricingPlans, Action::Read, self, Some(value))?;
                };

                Ok(value)
            }).map_err(|e: FailureError| {
                e.context(format!("Find pricing plan by plan id: {} error occurred", plan_id_arg))
                    .into()
            })
    }

    /// List plans visible on the public pricing page
    fn list_public(&self) -> RepoResult<Vec<PricingPlan>> {
        debug!("Find all public pricing plans.");
        let query = PricingPlans::pricing_plans
            .filter(PricingPlans::is_active.eq(true))
            .filter(PricingPlans::is_public.eq(true))
            .order(PricingPlans::display_order);

        query
            .get_results(self.db_conn)
            .map_err(From::from)
            .and_then(|values: Vec<PricingPlan>| {
                for value in &values {
                    acl::check(&*self.acl, Resource::PricingPlans, Action::Read, self, Some(&value))?;
                }

                Ok(values)
            }).map_err(|e: FailureError| e.context("List public pricing plans").into())
    }

    /// Update pricing plan
    fn update(&self, plan_id_arg: PlanId, payload: UpdatePricingPlan) -> RepoResult<PricingPlan> {
        debug!("Updating pricing plan {} with payload {:?}.", plan_id_arg, payload);
        let query = PricingPlans::pricing_plans.filter(PricingPlans::plan_id.eq(&plan_id_arg));

        query
            .get_result(self.db_conn)
            .map_err(From::from)
            .and_then(|value| acl::check(&*self.acl, Resource::PricingPlans, Action::Update, self, Some(&value)))
            .and_then(|_| {
                let filtered = PricingPlans::pricing_plans.filter(PricingPlans::plan_id.eq(&plan_id_arg));
                let query = diesel::update(filtered).set(&payload);

                query.get_result::<PricingPlan>(self.db_conn).map_err(From::from)
            }).map_err(|e: FailureError| {
                e.context(format!(
                    "Updates specific pricing plan: plan id: {}, payload: {:?}, error occurred",
                    plan_id_arg, payload
                )).into()
            })
    }
}

impl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> CheckScope<Scope, PricingPlan>
    for PricingPlansRepoImpl<'a, T>
{
    fn is_in_scope(&self, _user_id: UserId, scope: &Scope, _obj: Option<&PricingPlan>) -> bool {
        match *scope {
            Scope::All => true,
            // Plans are a platform wide registry.
            Scope::Owned => false,
        }
    }
}
