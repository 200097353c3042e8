//! Pricing plan registry service.

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use r2d2::ManageConnection;
use validator::Validate;

use errors::Error;
use models::{NewPricingPlan, PlanId, PricingPlan, UpdatePricingPlan};
use repos::ReposFactory;
use services::types::ServiceFuture;
use services::Service;

pub trait PricingPlansService {
    /// Creates new pricing plan
    fn create_pricing_plan(&self, payload: NewPricingPlan) -> ServiceFuture<PricingPlan>;
    /// Returns pricing plan by its external identifier
    fn get_pricing_plan(&self, plan_id: PlanId) -> ServiceFuture<Option<PricingPlan>>;
    /// Returns plans shown on the public pricing page
    fn list_pricing_plans(&self) -> ServiceFuture<Vec<PricingPlan>>;
    /// Update pricing plan
    fn update_pricing_plan(&self, plan_id: PlanId, payload: UpdatePricingPlan) -> ServiceFuture<PricingPlan>;
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > PricingPlansService for Service<T, M, F>
{
    /// Creates new pricing plan
    fn create_pricing_plan(&self, payload: NewPricingPlan) -> ServiceFuture<PricingPlan> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            payload
                .validate()
                .map_err(|e| format_err!("Validation of NewPricingPlan failed.").context(Error::Validate(e)).into())
                .and_then(|_| {
                    let pricing_plans_repo = repo_factory.create_pricing_plans_repo(&*conn, current_uid);
                    conn.transaction::<PricingPlan, FailureError, _>(move || pricing_plans_repo.create(payload))
                }).map_err(|e: FailureError| {
                    e.context("Service pricing_plans, create_pricing_plan endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Returns pricing plan by its external identifier
    fn get_pricing_plan(&self, plan_id: PlanId) -> ServiceFuture<Option<PricingPlan>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let pricing_plans_repo = repo_factory.create_pricing_plans_repo(&*conn, current_uid);
            pricing_plans_repo.get_by_plan_id(plan_id).map_err(|e: FailureError| {
                e.context("Service pricing_plans, get_pricing_plan endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Returns plans shown on the public pricing page
    fn list_pricing_plans(&self) -> ServiceFuture<Vec<PricingPlan>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let pricing_plans_repo = repo_factory.create_pricing_plans_repo(&*conn, current_uid);
            pricing_plans_repo.list_public().map_err(|e: FailureError| {
                e.context("Service pricing_plans, list_pricing_plans endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Update pricing plan
    fn update_pricing_plan(&self, plan_id: PlanId, payload: UpdatePricingPlan) -> ServiceFuture<PricingPlan> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            payload
                .validate()
                .map_err(|e| format_err!("Validation of UpdatePricingPlan failed.").context(Error::Validate(e)).into())
                .and_then(|_| {
                    let pricing_plans_repo = repo_factory.create_pricing_plans_repo(&*conn, current_uid);
                    conn.transaction::<PricingPlan, FailureError, _>(move || pricing_plans_repo.update(plan_id, payload))
                }).map_err(|e: FailureError| {
                    e.context("Service pricing_plans, update_pricing_plan endpoint error occurred.")
                        .into()
                })
        })
    }
}
