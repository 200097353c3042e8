//! Merchant coupons service: storefront validation and redemption, CRUD
//! and the analytics rollup for one organization.

use std::collections::HashMap;
use std::time::SystemTime;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use r2d2::ManageConnection;
use validator::Validate;

use errors::Error;
use models::*;
use repos::{MerchantCouponSearch, RedemptionSearch, RedemptionsRepo, ReposFactory};
use services::coupons::validation::{validate_merchant, MerchantPurchase};
use services::types::ServiceFuture;
use services::Service;

pub trait MerchantCouponsService {
    /// Creates new merchant coupon
    fn create_merchant_coupon(&self, payload: NewMerchantCoupon) -> ServiceFuture<MerchantCoupon>;
    /// Returns merchant coupon by id
    fn get_merchant_coupon(&self, id_arg: CouponId) -> ServiceFuture<Option<MerchantCoupon>>;
    /// Returns merchant coupon by code
    fn get_merchant_coupon_by_code(&self, payload: MerchantCouponsSearchCodePayload) -> ServiceFuture<Option<MerchantCoupon>>;
    /// Returns all coupons of an organization
    fn list_merchant_coupons(&self, organization_id: OrganizationId) -> ServiceFuture<Vec<MerchantCoupon>>;
    /// Update merchant coupon
    fn update_merchant_coupon(&self, id_arg: CouponId, payload: UpdateMerchantCoupon) -> ServiceFuture<MerchantCoupon>;
    /// Disable merchant coupon
    fn disable_merchant_coupon(&self, id_arg: CouponId) -> ServiceFuture<MerchantCoupon>;
    /// Validate merchant coupon against a purchase
    fn validate_merchant_coupon(&self, payload: ValidateMerchantCoupon) -> ServiceFuture<CouponValidation<MerchantCoupon>>;
    /// Redeem merchant coupon
    fn redeem_merchant_coupon(&self, payload: RedeemMerchantCoupon) -> ServiceFuture<CouponRedemption>;
    /// Usage rollup over all coupons of an organization
    fn coupon_analytics(&self, organization_id: OrganizationId) -> ServiceFuture<CouponAnalytics>;
}

fn customer_redemptions(
    redemptions_repo: &RedemptionsRepo,
    coupon: &MerchantCoupon,
    customer_id: Option<CustomerId>,
) -> Result<Option<i64>, FailureError> {
    match (coupon.max_uses_per_customer, customer_id) {
        (Some(_), Some(customer_id)) => redemptions_repo.count_for_customer(coupon.id, customer_id).map(Some),
        _ => Ok(None),
    }
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > MerchantCouponsService for Service<T, M, F>
{
    /// Creates new merchant coupon
    fn create_merchant_coupon(&self, payload: NewMerchantCoupon) -> ServiceFuture<MerchantCoupon> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            payload
                .validate()
                .map_err(|e| format_err!("Validation of NewMerchantCoupon failed.").context(Error::Validate(e)).into())
                .and_then(|_| {
                    let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo(&*conn, current_uid);
                    conn.transaction::<MerchantCoupon, FailureError, _>(move || merchant_coupons_repo.create(payload))
                }).map_err(|e: FailureError| {
                    e.context("Service merchant_coupons, create_merchant_coupon endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Returns merchant coupon by id
    fn get_merchant_coupon(&self, id_arg: CouponId) -> ServiceFuture<Option<MerchantCoupon>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo(&*conn, current_uid);
            merchant_coupons_repo.get(id_arg).map_err(|e: FailureError| {
                e.context("Service merchant_coupons, get_merchant_coupon endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Returns merchant coupon by code
    fn get_merchant_coupon_by_code(&self, payload: MerchantCouponsSearchCodePayload) -> ServiceFuture<Option<MerchantCoupon>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo(&*conn, current_uid);
            merchant_coupons_repo
                .get_by_code(payload.code, payload.organization_id)
                .map_err(|e: FailureError| {
                    e.context("Service merchant_coupons, get_merchant_coupon_by_code endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Returns all coupons of an organization
    fn list_merchant_coupons(&self, organization_id: OrganizationId) -> ServiceFuture<Vec<MerchantCoupon>> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo(&*conn, current_uid);
            merchant_coupons_repo
                .find_by(MerchantCouponSearch::Organization(organization_id))
                .map_err(|e: FailureError| {
                    e.context("Service merchant_coupons, list_merchant_coupons endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Update merchant coupon
    fn update_merchant_coupon(&self, id_arg: CouponId, payload: UpdateMerchantCoupon) -> ServiceFuture<MerchantCoupon> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            payload
                .validate()
                .map_err(|e| format_err!("Validation of UpdateMerchantCoupon failed.").context(Error::Validate(e)).into())
                .and_then(|_| {
                    let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo(&*conn, current_uid);
                    conn.transaction::<MerchantCoupon, FailureError, _>(move || merchant_coupons_repo.update(id_arg, payload))
                }).map_err(|e: FailureError| {
                    e.context("Service merchant_coupons, update_merchant_coupon endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Disable merchant coupon
    fn disable_merchant_coupon(&self, id_arg: CouponId) -> ServiceFuture<MerchantCoupon> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo(&*conn, current_uid);
            conn.transaction::<MerchantCoupon, FailureError, _>(move || {
                merchant_coupons_repo.update(id_arg, UpdateMerchantCoupon::disable())
            }).map_err(|e: FailureError| {
                e.context("Service merchant_coupons, disable_merchant_coupon endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Validate merchant coupon against a purchase. Runs with system
    /// rights: the storefront validates on behalf of anonymous customers.
    fn validate_merchant_coupon(&self, payload: ValidateMerchantCoupon) -> ServiceFuture<CouponValidation<MerchantCoupon>> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo_with_sys_acl(&*conn);
            let redemptions_repo = repo_factory.create_redemptions_repo_with_sys_acl(&*conn);

            merchant_coupons_repo
                .get_by_code(payload.code.clone(), payload.organization_id)
                .and_then(|coupon| match coupon {
                    Some(coupon) => {
                        let redeemed = customer_redemptions(&*redemptions_repo, &coupon, payload.customer_id)?;
                        let purchase = MerchantPurchase {
                            amount: payload.purchase_amount,
                            product_ids: payload.product_ids.clone(),
                            is_ai_request: payload.is_ai_request,
                        };
                        Ok(validate_merchant(coupon, &purchase, redeemed, SystemTime::now()))
                    }
                    None => Ok(CouponValidation::invalid(ValidationErrorCode::CouponNotFound)),
                }).map_err(|e: FailureError| {
                    e.context("Service merchant_coupons, validate_merchant_coupon endpoint error occurred.")
                        .into()
                })
        })
    }

    /// Redeem merchant coupon. Lookup, re-validation, the usage counter
    /// increment and the redemption record run in one transaction.
    fn redeem_merchant_coupon(&self, payload: RedeemMerchantCoupon) -> ServiceFuture<CouponRedemption> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo_with_sys_acl(&*conn);
            let redemptions_repo = repo_factory.create_redemptions_repo_with_sys_acl(&*conn);

            conn.transaction::<CouponRedemption, FailureError, _>(move || {
                let coupon = match merchant_coupons_repo.get_by_code(payload.code.clone(), payload.organization_id)? {
                    Some(coupon) => coupon,
                    None => return Ok(CouponRedemption::rejected(ValidationErrorCode::CouponNotFound)),
                };

                let applied_by = payload.applied_by.unwrap_or(AppliedBy::User);
                let is_ai_request = applied_by == AppliedBy::AiAgent || payload.agent_id.is_some();

                let redeemed = customer_redemptions(&*redemptions_repo, &coupon, Some(payload.customer_id))?;
                let purchase = MerchantPurchase {
                    amount: payload.purchase_amount,
                    product_ids: payload.product_ids.clone(),
                    is_ai_request,
                };

                let valid = match validate_merchant(coupon, &purchase, redeemed, SystemTime::now()) {
                    CouponValidation::Valid(valid) => valid,
                    CouponValidation::Invalid(code) => return Ok(CouponRedemption::rejected(code)),
                };

                if !merchant_coupons_repo.register_use(valid.coupon.id)? {
                    return Ok(CouponRedemption::rejected(ValidationErrorCode::CouponDepleted));
                }

                let redemption = redemptions_repo.create(NewRedemption {
                    id: RedemptionId::new(),
                    coupon_id: valid.coupon.id,
                    coupon_scope: CouponScope::Merchant,
                    coupon_code: valid.coupon.code.clone(),
                    organization_id: payload.organization_id,
                    customer_id: Some(payload.customer_id),
                    original_amount: payload.purchase_amount,
                    discount_amount: valid.discount_amount,
                    final_amount: valid.final_amount,
                    applied_by,
                    agent_id: payload.agent_id.clone(),
                    order_id: Some(payload.order_id.clone()),
                })?;

                // Merchant coupons never bypass checkout payment.
                Ok(CouponRedemption::redeemed(redemption, false))
            }).map_err(|e: FailureError| {
                e.context("Service merchant_coupons, redeem_merchant_coupon endpoint error occurred.")
                    .into()
            })
        })
    }

    /// Usage rollup over all coupons of an organization
    fn coupon_analytics(&self, organization_id: OrganizationId) -> ServiceFuture<CouponAnalytics> {
        let current_uid = self.dynamic_context.user_id;
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let merchant_coupons_repo = repo_factory.create_merchant_coupons_repo(&*conn, current_uid);
            let redemptions_repo = repo_factory.create_redemptions_repo(&*conn, current_uid);

            merchant_coupons_repo
                .find_by(MerchantCouponSearch::Organization(organization_id))
                .and_then(|coupons| {
                    let redemptions = redemptions_repo.find_by(RedemptionSearch::Organization(organization_id))?;

                    let total_coupons = coupons.len() as i64;
                    let active_coupons = coupons.iter().filter(|coupon| coupon.status == CouponStatus::Active).count() as i64;

                    let mut total_redemptions = 0;
                    let mut total_discount_given = Amount::zero();
                    let mut usage: HashMap<CouponCode, CouponUsage> = HashMap::new();
                    for redemption in redemptions.iter().filter(|r| r.coupon_scope == CouponScope::Merchant) {
                        total_redemptions += 1;
                        total_discount_given = total_discount_given + redemption.discount_amount;
                        let entry = usage.entry(redemption.coupon_code.clone()).or_insert_with(|| CouponUsage {
                            code: redemption.coupon_code.clone(),
                            redemptions: 0,
                            discount_given: Amount::zero(),
                        });
                        entry.redemptions += 1;
                        entry.discount_given = entry.discount_given + redemption.discount_amount;
                    }

                    let mut top_coupons: Vec<CouponUsage> = usage.into_iter().map(|(_, value)| value).collect();
                    top_coupons.sort_by(|a, b| b.redemptions.cmp(&a.redemptions));
                    top_coupons.truncate(5);

                    Ok(CouponAnalytics {
                        total_coupons,
                        active_coupons,
                        total_redemptions,
                        total_discount_given,
                        top_coupons,
                    })
                }).map_err(|e: FailureError| {
                    e.context("Service merchant_coupons, coupon_analytics endpoint error occurred.")
                        .into()
                })
        })
    }
}
