//! AI agent authorization and the discount request tracker.

use std::time::SystemTime;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use r2d2::ManageConnection;
use validator::Validate;

use errors::Error;
use models::*;
use repos::{MerchantCouponSearch, ReposFactory};
use services::types::ServiceFuture;
use services::Service;

/// Approval threshold used when the organization has not set its own.
const DEFAULT_HUMAN_APPROVAL_THRESHOLD: f64 = 30.0;

pub trait AiDiscountsService {
    /// Builds the authorization policy handed to an agent for one organization
    fn get_authorized_discounts(&self, organization_id: OrganizationId, options: AuthorizationOptions) -> ServiceFuture<AuthorizationPolicy>;
    /// Records a discount an agent wants to grant and resolves it against the threshold
    fn request_ai_discount(&self, payload: AiDiscountRequestPayload) -> ServiceFuture<AiDiscountRequest>;
    /// Returns tracked AI discount requests of an organization
    fn list_ai_discount_requests(&self, organization_id: OrganizationId) -> ServiceFuture<Vec<AiDiscountRequest>>;
}

/// Assembles the policy from organization settings and the AI authorized
/// coupons. Only active coupons are offered; without negotiation rights or
/// admin status an agent only sees public marketing coupons, and coupons
/// with no category stay hidden.
pub fn build_policy(organization: &Organization, coupons: Vec<MerchantCoupon>, options: AuthorizationOptions) -> AuthorizationPolicy {
    let is_admin = options.is_internal_admin || organization.is_internal_admin;

    let available_coupons: Vec<AuthorizedDiscount> = coupons
        .iter()
        .filter(|coupon| coupon.status == CouponStatus::Active)
        .filter(|coupon| {
            is_admin || options.can_negotiate || coupon.coupon_category == Some(CouponCategory::PublicMarketing)
        }).map(AuthorizedDiscount::from)
        .collect();

    let max_discount_percentage = organization.ai_max_discount_percentage.unwrap_or_else(|| {
        available_coupons
            .iter()
            .filter(|discount| discount.discount_type == DiscountType::Percentage)
            .fold(0.0, |max, discount| if discount.value > max { discount.value } else { max })
    });

    AuthorizationPolicy {
        available_coupons,
        max_discount_percentage,
        require_human_approval_above: organization
            .ai_human_approval_threshold
            .unwrap_or(DEFAULT_HUMAN_APPROVAL_THRESHOLD),
        can_stack_discounts: organization.ai_can_stack_discounts.unwrap_or(false),
        auto_offer_on_hesitation: organization.ai_auto_offer_on_hesitation.unwrap_or(true),
        auto_offer_on_price_objection: organization.ai_auto_offer_on_price_objection.unwrap_or(true),
    }
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > AiDiscountsService for Service<T, M, F>
{
    /// Builds the authorization policy handed to an agent for one organization
    fn get_authorized_discounts(&self, organization_id: OrganizationId, options: AuthorizationOptions) -> ServiceFuture<AuthorizationPolicy> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let organizations_repo = repo_factory.create_organizations_repo_with_sys_acl(&*conn);
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo_with_sys_acl(&*conn);

            organizations_repo
                .get(organization_id)
                .and_then(|organization| {
                    organization.ok_or_else(|| {
                        format_err!("Organization {} not found", organization_id)
                            .context(Error::NotFound)
                            .into()
                    })
                }).and_then(|organization| {
                    let coupons = merchant_coupons_repo.find_by(MerchantCouponSearch::AiAuthorized(organization_id))?;
                    Ok(build_policy(&organization, coupons, options))
                }).map_err(|e: FailureError| {
                    e.context("Service ai_discounts, get_authorized_discounts endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Records a discount an agent wants to grant and resolves it against the threshold
    fn request_ai_discount(&self, payload: AiDiscountRequestPayload) -> ServiceFuture<AiDiscountRequest> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            payload
                .validate()
                .map_err(|e| {
                    format_err!("Validation of AiDiscountRequestPayload failed.")
                        .context(Error::Validate(e))
                        .into()
                }).and_then(|_| {
                    let organizations_repo = repo_factory.create_organizations_repo_with_sys_acl(&*conn);
                    let ai_requests_repo = repo_factory.create_ai_discount_requests_repo_with_sys_acl(&*conn);

                    let organization = organizations_repo.get(payload.organization_id)?.ok_or_else(|| -> FailureError {
                        format_err!("Organization {} not found", payload.organization_id)
                            .context(Error::NotFound)
                            .into()
                    })?;

                    let threshold = organization
                        .ai_human_approval_threshold
                        .unwrap_or(DEFAULT_HUMAN_APPROVAL_THRESHOLD);
                    let (status, resolved_at) = if payload.requested_discount <= threshold {
                        (AiRequestStatus::AutoApproved, Some(SystemTime::now()))
                    } else {
                        (AiRequestStatus::PendingApproval, None)
                    };

                    conn.transaction::<AiDiscountRequest, FailureError, _>(move || {
                        ai_requests_repo.create(NewAiDiscountRequest {
                            id: AiRequestId::new(),
                            organization_id: payload.organization_id,
                            agent_id: payload.agent_id.clone(),
                            conversation_id: payload.conversation_id.clone(),
                            requested_discount: payload.requested_discount,
                            coupon_code: payload.coupon_code.clone().map(|code| code.normalize()),
                            status,
                            customer_context: payload.customer_context.clone(),
                            resolved_at,
                        })
                    })
                }).map_err(|e: FailureError| {
                    e.context("Service ai_discounts, request_ai_discount endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Returns tracked AI discount requests of an organization
    fn list_ai_discount_requests(&self, organization_id: OrganizationId) -> ServiceFuture<Vec<AiDiscountRequest>> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let ai_requests_repo = repo_factory.create_ai_discount_requests_repo_with_sys_acl(&*conn);
            ai_requests_repo.find_by_organization(organization_id).map_err(|e: FailureError| {
                e.context("Service ai_discounts, list_ai_discount_requests endpoint error occurred.")
                    .into()
            })
        })
    }
}
