//! Platform coupons service: subscription checkout validation, redemption
//! and CRUD for platform scope coupons.

use std::time::SystemTime;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use r2d2::ManageConnection;
use validator::Validate;

use errors::Error;
use models::*;
use repos::ReposFactory;
use services::coupons::validation::validate_platform;
use services::types::ServiceFuture;
use services::Service;

pub trait PlatformCouponsService {
    /// Creates new platform coupon
    fn create_platform_coupon(&self, payload: NewPlatformCoupon) -> ServiceFuture<PlatformCoupon>;
    /// Returns all platform coupons
    fn list_platform_coupons(&self) -> ServiceFuture<Vec<PlatformCoupon>>;
    /// Returns platform coupon by id
    fn get_platform_coupon(&self, id_arg: CouponId) -> ServiceFuture<Option<PlatformCoupon>>;
    /// Returns platform coupon by code
    fn get_platform_coupon_by_code(&self, code_arg: CouponCode) -> ServiceFuture<Option<PlatformCoupon>>;
    /// Validate platform coupon against a subscription checkout
    fn validate_platform_coupon(&self, payload: ValidatePlatformCoupon) -> ServiceFuture<CouponValidation<PlatformCoupon>>;
    /// Redeem platform coupon
    fn redeem_platform_coupon(&self, payload: RedeemPlatformCoupon) -> ServiceFuture<CouponRedemption>;
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > PlatformCouponsService for Service<T, M, F>
{
    /// Creates new platform coupon
    fn create_platform_coupon(&self, payload: NewPlatformCoupon) -> ServiceFuture<PlatformCoupon> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            payload
                .validate()
                .map_err(|e| format_err!("Validation of NewPlatformCoupon failed.").context(Error::Validate(e)).into())
                .and_then(|_| {
                    let platform_coupons_repo = repo_factory.create_platform_coupons_repo(&*conn, current_uid);
                    conn.transaction::<PlatformCoupon, FailureError, _>(move || platform_coupons_repo.create(payload))
                }).map_err(|e: FailureError| {
                    e.context("Service platform_coupons, create_platform_coupon endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Returns all platform coupons
    fn list_platform_coupons(&self) -> ServiceFuture<Vec<PlatformCoupon>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let platform_coupons_repo = repo_factory.create_platform_coupons_repo(&*conn, current_uid);
            platform_coupons_repo.list().map_err(|e: FailureError| {
                e.context("Service platform_coupons, list_platform_coupons endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Returns platform coupon by id
    fn get_platform_coupon(&self, id_arg: CouponId) -> ServiceFuture<Option<PlatformCoupon>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let platform_coupons_repo = repo_factory.create_platform_coupons_repo(&*conn, current_uid);
            platform_coupons_repo.get(id_arg).map_err(|e: FailureError| {
                e.context("Service platform_coupons, get_platform_coupon endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Returns platform coupon by code
    fn get_platform_coupon_by_code(&self, code_arg: CouponCode) -> ServiceFuture<Option<PlatformCoupon>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let platform_coupons_repo = repo_factory.create_platform_coupons_repo(&*conn, current_uid);
            platform_coupons_repo.get_by_code(code_arg).map_err(|e: FailureError| {
                e.context("Service platform_coupons, get_platform_coupon_by_code endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Validate platform coupon against a subscription checkout
    fn validate_platform_coupon(&self, payload: ValidatePlatformCoupon) -> ServiceFuture<CouponValidation<PlatformCoupon>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let platform_coupons_repo = repo_factory.create_platform_coupons_repo(&*conn, current_uid);
            platform_coupons_repo
                .get_by_code(payload.code.clone())
                .map(|coupon| match coupon {
                    Some(coupon) => validate_platform(
                        coupon,
                        &payload.plan_id,
                        payload.billing_cycle,
                        payload.original_amount,
                        SystemTime::now(),
                    ),
                    None => CouponValidation::invalid(ValidationErrorCode::CouponNotFound),
                }).map_err(|e: FailureError| {
                    e.context("Service platform_coupons, validate_platform_coupon endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Redeem platform coupon. Lookup, re-validation, counter increment,
    /// redemption record and the optional free-forever activation run in
    /// one transaction.
    fn redeem_platform_coupon(&self, payload: RedeemPlatformCoupon) -> ServiceFuture<CouponRedemption> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let platform_coupons_repo = repo_factory.create_platform_coupons_repo_with_sys_acl(&*conn);
            let redemptions_repo = repo_factory.create_redemptions_repo_with_sys_acl(&*conn);
            let organizations_repo = repo_factory.create_organizations_repo_with_sys_acl(&*conn);

            conn.transaction::<CouponRedemption, FailureError, _>(move || {
                let coupon = match platform_coupons_repo.get_by_code(payload.code.clone())? {
                    Some(coupon) => coupon,
                    None => return Ok(CouponRedemption::rejected(ValidationErrorCode::CouponNotFound)),
                };

                let valid = match validate_platform(
                    coupon,
                    &payload.plan_id,
                    payload.billing_cycle,
                    payload.original_amount,
                    SystemTime::now(),
                ) {
                    CouponValidation::Valid(valid) => valid,
                    CouponValidation::Invalid(code) => return Ok(CouponRedemption::rejected(code)),
                };

                if !platform_coupons_repo.register_use(valid.coupon.id)? {
                    return Ok(CouponRedemption::rejected(ValidationErrorCode::CouponDepleted));
                }

                let bypass_stripe = valid.coupon.grants_free_forever();
                if bypass_stripe {
                    organizations_repo.activate_free_forever(payload.organization_id, valid.coupon.code.clone())?;
                }

                let redemption = redemptions_repo.create(NewRedemption {
                    id: RedemptionId::new(),
                    coupon_id: valid.coupon.id,
                    coupon_scope: CouponScope::Platform,
                    coupon_code: valid.coupon.code.clone(),
                    organization_id: payload.organization_id,
                    customer_id: None,
                    original_amount: payload.original_amount,
                    discount_amount: valid.discount_amount,
                    final_amount: valid.final_amount,
                    applied_by: payload.applied_by.unwrap_or(AppliedBy::User),
                    agent_id: None,
                    order_id: None,
                })?;

                Ok(CouponRedemption::redeemed(redemption, bypass_stripe))
            }).map_err(|e: FailureError| {
                e.context("Service platform_coupons, redeem_platform_coupon endpoint error occurred.")
                    .into()
            })
        })
    }
}
