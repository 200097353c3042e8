use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;

use models::*;
use repos::legacy_acl::{Acl, SystemACL};
use repos::*;

pub trait ReposFactory<C: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static>: Clone + Send + 'static {
    fn create_merchant_coupons_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<MerchantCouponsRepo + 'a>;
    fn create_merchant_coupons_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<MerchantCouponsRepo + 'a>;
    fn create_platform_coupons_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<PlatformCouponsRepo + 'a>;
    fn create_platform_coupons_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<PlatformCouponsRepo + 'a>;
    fn create_redemptions_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<RedemptionsRepo + 'a>;
    fn create_redemptions_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<RedemptionsRepo + 'a>;
    fn create_organizations_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<OrganizationsRepo + 'a>;
    fn create_organizations_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<OrganizationsRepo + 'a>;
    fn create_ai_discount_requests_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<AiDiscountRequestsRepo + 'a>;
    fn create_pricing_plans_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<PricingPlansRepo + 'a>;
    fn create_user_roles_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<UserRolesRepo + 'a>;
}

#[derive(Clone, Default)]
pub struct ReposFactoryImpl;

impl ReposFactoryImpl {
    pub fn get_roles<'a, C: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static>(
        &self,
        id: UserId,
        db_conn: &'a C,
    ) -> Vec<Role> {
        self.create_user_roles_repo_with_sys_acl(db_conn)
            .list_for_user(id)
            .ok()
            .unwrap_or_default()
    }

    fn get_acl<'a, T, C: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static>(
        &self,
        db_conn: &'a C,
        user_id: Option<UserId>,
    ) -> Box<Acl<Resource, Action, Scope, FailureError, T>> {
        user_id.map_or(
            Box::new(UnauthorizedAcl::default()) as Box<Acl<Resource, Action, Scope, FailureError, T>>,
            |id| {
                let roles = self.get_roles(id, db_conn);
                (Box::new(ApplicationAcl::new(roles, id)) as Box<Acl<Resource, Action, Scope, FailureError, T>>)
            },
        )
    }
}

impl<C: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> ReposFactory<C> for ReposFactoryImpl {
    fn create_merchant_coupons_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<MerchantCouponsRepo + 'a> {
        let acl = self.get_acl(db_conn, user_id);
        Box::new(MerchantCouponsRepoImpl::new(db_conn, acl)) as Box<MerchantCouponsRepo>
    }
    fn create_merchant_coupons_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<MerchantCouponsRepo + 'a> {
        Box::new(MerchantCouponsRepoImpl::new(
            db_conn,
            Box::new(SystemACL::default()) as Box<Acl<Resource, Action, Scope, FailureError, MerchantCoupon>>,
        )) as Box<MerchantCouponsRepo>
    }
    fn create_platform_coupons_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<PlatformCouponsRepo + 'a> {
        let acl = self.get_acl(db_conn, user_id);
        Box::new(PlatformCouponsRepoImpl::new(db_conn, acl)) as Box<PlatformCouponsRepo>
    }
    fn create_platform_coupons_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<PlatformCouponsRepo + 'a> {
        Box::new(PlatformCouponsRepoImpl::new(
            db_conn,
            Box::new(SystemACL::default()) as Box<Acl<Resource, Action, Scope, FailureError, PlatformCoupon>>,
        )) as Box<PlatformCouponsRepo>
    }
    fn create_redemptions_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<RedemptionsRepo + 'a> {
        let acl = self.get_acl(db_conn, user_id);
        Box::new(RedemptionsRepoImpl::new(db_conn, acl)) as Box<RedemptionsRepo>
    }
    fn create_redemptions_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<RedemptionsRepo + 'a> {
        Box::new(RedemptionsRepoImpl::new(
            db_conn,
            Box::new(SystemACL::default()) as Box<Acl<Resource, Action, Scope, FailureError, Redemption>>,
        )) as Box<RedemptionsRepo>
    }
    fn create_organizations_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<OrganizationsRepo + 'a> {
        let acl = self.get_acl(db_conn, user_id);
        Box::new(OrganizationsRepoImpl::new(db_conn, acl)) as Box<OrganizationsRepo>
    }
    fn create_organizations_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<OrganizationsRepo + 'a> {
        Box::new(OrganizationsRepoImpl::new(
            db_conn,
            Box::new(SystemACL::default()) as Box<Acl<Resource, Action, Scope, FailureError, Organization>>,
        )) as Box<OrganizationsRepo>
    }
    fn create_ai_discount_requests_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<AiDiscountRequestsRepo + 'a> {
        Box::new(AiDiscountRequestsRepoImpl::new(
            db_conn,
            Box::new(SystemACL::default()) as Box<Acl<Resource, Action, Scope, FailureError, AiDiscountRequest>>,
        )) as Box<AiDiscountRequestsRepo>
    }
    fn create_pricing_plans_repo<'a>(&self, db_conn: &'a C, user_id: Option<UserId>) -> Box<PricingPlansRepo + 'a> {
        let acl = self.get_acl(db_conn, user_id);
        Box::new(PricingPlansRepoImpl::new(db_conn, acl)) as Box<PricingPlansRepo>
    }
    fn create_user_roles_repo_with_sys_acl<'a>(&self, db_conn: &'a C) -> Box<UserRolesRepo + 'a> {
        Box::new(UserRolesRepoImpl::new(
            db_conn,
            Box::new(SystemACL::default()) as Box<Acl<Resource, Action, Scope, FailureError, UserRole>>,
        )) as Box<UserRolesRepo>
    }
}

#[cfg(test)]
pub mod tests {

    use std::error::Error;
    use std::fmt;
    use std::time::{Duration, SystemTime};

    use diesel::connection::AnsiTransactionManager;
    use diesel::connection::SimpleConnection;
    use diesel::deserialize::QueryableByName;
    use diesel::pg::Pg;
    use diesel::query_builder::AsQuery;
    use diesel::query_builder::QueryFragment;
    use diesel::query_builder::QueryId;
    use diesel::sql_types::HasSqlType;
    use diesel::Connection;
    use diesel::ConnectionResult;
    use diesel::QueryResult;
    use diesel::Queryable;
    use futures_cpupool::CpuPool;
    use r2d2;
    use r2d2::ManageConnection;

    use models::*;
    use repos::*;
    use services::*;

    pub const MOCK_REPO_FACTORY: ReposFactoryMock = ReposFactoryMock {};
    pub static MOCK_USER_ID: UserId = UserId(1);
    pub static MOCK_ORGANIZATION_ID: OrganizationId = OrganizationId(1);
    pub static MOCK_ADMIN_ORGANIZATION_ID: OrganizationId = OrganizationId(2);
    pub static MOCK_POLICY_ORGANIZATION_ID: OrganizationId = OrganizationId(3);
    pub static MOCK_CUSTOMER_ID: CustomerId = CustomerId(10);
    pub static MOCK_LIMITED_CUSTOMER_ID: CustomerId = CustomerId(99);

    pub fn create_service(user_id: Option<UserId>) -> Service<MockConnection, MockConnectionManager, ReposFactoryMock> {
        let manager = MockConnectionManager::default();
        let db_pool = r2d2::Pool::builder().build(manager).expect("Failed to create connection pool");
        let cpu_pool = CpuPool::new(1);

        let static_context = StaticContext::new(db_pool, cpu_pool, MOCK_REPO_FACTORY);
        let dynamic_context = DynamicContext::new(user_id);

        Service::new(static_context, dynamic_context)
    }

    fn base_merchant_coupon(id: i32, code: &str) -> MerchantCoupon {
        MerchantCoupon {
            id: CouponId(id),
            code: CouponCode(code.to_string()),
            organization_id: MOCK_ORGANIZATION_ID,
            description: None,
            status: CouponStatus::Active,
            discount_type: DiscountType::Percentage,
            value: 20.0,
            min_purchase: None,
            max_discount: None,
            applies_to: AppliesTo::All,
            product_ids: None,
            max_uses: None,
            current_uses: 0,
            max_uses_per_customer: None,
            valid_from: SystemTime::now() - Duration::from_secs(3600),
            valid_until: None,
            ai_authorized: false,
            ai_discount_limit: None,
            coupon_category: None,
            ai_trigger_keywords: None,
            created_by: Some(MOCK_USER_ID),
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    pub fn create_merchant_coupon(code: &str) -> Option<MerchantCoupon> {
        match code {
            // 20% off everything
            "SAVE20" => Some(base_merchant_coupon(1, "SAVE20")),
            // $5 off purchases of $50 or more
            "WELCOME5" => Some(MerchantCoupon {
                discount_type: DiscountType::Fixed,
                value: 5.0,
                min_purchase: Some(Amount(50.0)),
                ..base_merchant_coupon(2, "WELCOME5")
            }),
            // single use coupon that is already used up
            "VIP10" => Some(MerchantCoupon {
                value: 10.0,
                max_uses: Some(1),
                current_uses: 1,
                max_uses_per_customer: Some(1),
                ..base_merchant_coupon(3, "VIP10")
            }),
            // not cleared for AI agents
            "BIGDEAL" => Some(MerchantCoupon {
                value: 30.0,
                max_discount: Some(Amount(100.0)),
                ..base_merchant_coupon(4, "BIGDEAL")
            }),
            "NEGOTIATE15" => Some(MerchantCoupon {
                value: 15.0,
                ai_authorized: true,
                ai_discount_limit: Some(15.0),
                coupon_category: Some(CouponCategory::Negotiation),
                ai_trigger_keywords: Some(vec!["too expensive".to_string()]),
                ..base_merchant_coupon(5, "NEGOTIATE15")
            }),
            "SPRING10" => Some(MerchantCoupon {
                value: 10.0,
                ai_authorized: true,
                coupon_category: Some(CouponCategory::PublicMarketing),
                ..base_merchant_coupon(6, "SPRING10")
            }),
            _ => None,
        }
    }

    fn merchant_coupon_codes() -> Vec<&'static str> {
        vec!["SAVE20", "WELCOME5", "VIP10", "BIGDEAL", "NEGOTIATE15", "SPRING10"]
    }

    fn base_platform_coupon(id: i32, code: &str) -> PlatformCoupon {
        PlatformCoupon {
            id: CouponId(id),
            code: CouponCode(code.to_string()),
            description: None,
            status: CouponStatus::Active,
            discount_type: DiscountType::Percentage,
            value: 50.0,
            applies_to_plans: None,
            billing_cycles: None,
            is_free_forever: false,
            max_uses: None,
            current_uses: 0,
            valid_from: SystemTime::now() - Duration::from_secs(3600),
            valid_until: None,
            created_by: Some(MOCK_USER_ID),
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    pub fn create_platform_coupon(code: &str) -> Option<PlatformCoupon> {
        match code {
            // half off the first payment on starter and pro
            "LAUNCH50" => Some(PlatformCoupon {
                applies_to_plans: Some(vec![PlanId("starter".to_string()), PlanId("pro".to_string())]),
                ..base_platform_coupon(1, "LAUNCH50")
            }),
            "FREE100" => Some(PlatformCoupon {
                value: 100.0,
                is_free_forever: true,
                ..base_platform_coupon(2, "FREE100")
            }),
            "EXPIRED10" => Some(PlatformCoupon {
                value: 10.0,
                status: CouponStatus::Expired,
                ..base_platform_coupon(3, "EXPIRED10")
            }),
            "YEARLY20" => Some(PlatformCoupon {
                value: 20.0,
                billing_cycles: Some(vec![BillingCycle::Yearly]),
                ..base_platform_coupon(4, "YEARLY20")
            }),
            _ => None,
        }
    }

    fn platform_coupon_codes() -> Vec<&'static str> {
        vec!["LAUNCH50", "FREE100", "EXPIRED10", "YEARLY20"]
    }

    pub fn create_organization(id: OrganizationId) -> Organization {
        Organization {
            id,
            name: "Mock org".to_string(),
            owner_id: MOCK_USER_ID,
            status: OrganizationStatus::Active,
            subscription_status: SubscriptionStatus::Active,
            is_internal: false,
            is_internal_admin: id == MOCK_ADMIN_ORGANIZATION_ID,
            ai_max_discount_percentage: if id == MOCK_POLICY_ORGANIZATION_ID { Some(25.0) } else { None },
            ai_human_approval_threshold: if id == MOCK_POLICY_ORGANIZATION_ID { Some(10.0) } else { None },
            ai_can_stack_discounts: if id == MOCK_POLICY_ORGANIZATION_ID { Some(true) } else { None },
            ai_auto_offer_on_hesitation: if id == MOCK_POLICY_ORGANIZATION_ID { Some(false) } else { None },
            ai_auto_offer_on_price_objection: if id == MOCK_POLICY_ORGANIZATION_ID { Some(false) } else { None },
            stripe_customer_id: Some("cus_mock".to_string()),
            stripe_subscription_id: Some("sub_mock".to_string()),
            activated_with_coupon: None,
            activated_at: None,
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    #[derive(Default, Copy, Clone)]
    pub struct ReposFactoryMock;

    impl<C: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> ReposFactory<C> for ReposFactoryMock {
        fn create_merchant_coupons_repo<'a>(&self, _db_conn: &'a C, _user_id: Option<UserId>) -> Box<MerchantCouponsRepo + 'a> {
            Box::new(MerchantCouponsRepoMock::default()) as Box<MerchantCouponsRepo>
        }
        fn create_merchant_coupons_repo_with_sys_acl<'a>(&self, _db_conn: &'a C) -> Box<MerchantCouponsRepo + 'a> {
            Box::new(MerchantCouponsRepoMock::default()) as Box<MerchantCouponsRepo>
        }
        fn create_platform_coupons_repo<'a>(&self, _db_conn: &'a C, _user_id: Option<UserId>) -> Box<PlatformCouponsRepo + 'a> {
            Box::new(PlatformCouponsRepoMock::default()) as Box<PlatformCouponsRepo>
        }
        fn create_platform_coupons_repo_with_sys_acl<'a>(&self, _db_conn: &'a C) -> Box<PlatformCouponsRepo + 'a> {
            Box::new(PlatformCouponsRepoMock::default()) as Box<PlatformCouponsRepo>
        }
        fn create_redemptions_repo<'a>(&self, _db_conn: &'a C, _user_id: Option<UserId>) -> Box<RedemptionsRepo + 'a> {
            Box::new(RedemptionsRepoMock::default()) as Box<RedemptionsRepo>
        }
        fn create_redemptions_repo_with_sys_acl<'a>(&self, _db_conn: &'a C) -> Box<RedemptionsRepo + 'a> {
            Box::new(RedemptionsRepoMock::default()) as Box<RedemptionsRepo>
        }
        fn create_organizations_repo<'a>(&self, _db_conn: &'a C, _user_id: Option<UserId>) -> Box<OrganizationsRepo + 'a> {
            Box::new(OrganizationsRepoMock::default()) as Box<OrganizationsRepo>
        }
        fn create_organizations_repo_with_sys_acl<'a>(&self, _db_conn: &'a C) -> Box<OrganizationsRepo + 'a> {
            Box::new(OrganizationsRepoMock::default()) as Box<OrganizationsRepo>
        }
        fn create_ai_discount_requests_repo_with_sys_acl<'a>(&self, _db_conn: &'a C) -> Box<AiDiscountRequestsRepo + 'a> {
            Box::new(AiDiscountRequestsRepoMock::default()) as Box<AiDiscountRequestsRepo>
        }
        fn create_pricing_plans_repo<'a>(&self, _db_conn: &'a C, _user_id: Option<UserId>) -> Box<PricingPlansRepo + 'a> {
            Box::new(PricingPlansRepoMock::default()) as Box<PricingPlansRepo>
        }
        fn create_user_roles_repo_with_sys_acl<'a>(&self, _db_conn: &'a C) -> Box<UserRolesRepo + 'a> {
            Box::new(UserRolesRepoMock::default()) as Box<UserRolesRepo>
        }
    }

    #[derive(Clone, Default)]
    pub struct MerchantCouponsRepoMock;

    impl MerchantCouponsRepo for MerchantCouponsRepoMock {
        fn create(&self, payload: NewMerchantCoupon) -> RepoResult<MerchantCoupon> {
            Ok(MerchantCoupon {
                id: CouponId(1),
                code: payload.code.normalize(),
                organization_id: payload.organization_id,
                description: payload.description,
                status: CouponStatus::Active,
                discount_type: payload.discount_type,
                value: payload.value,
                min_purchase: payload.min_purchase,
                max_discount: payload.max_discount,
                applies_to: payload.applies_to,
                product_ids: payload.product_ids,
                max_uses: payload.max_uses,
                current_uses: 0,
                max_uses_per_customer: payload.max_uses_per_customer,
                valid_from: payload.valid_from,
                valid_until: payload.valid_until,
                ai_authorized: payload.ai_authorized,
                ai_discount_limit: payload.ai_discount_limit,
                coupon_category: payload.coupon_category,
                ai_trigger_keywords: payload.ai_trigger_keywords,
                created_by: payload.created_by,
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            })
        }

        fn get(&self, id_arg: CouponId) -> RepoResult<Option<MerchantCoupon>> {
            Ok(merchant_coupon_codes()
                .into_iter()
                .filter_map(create_merchant_coupon)
                .find(|coupon| coupon.id == id_arg))
        }

        fn get_by_code(&self, code_arg: CouponCode, organization_id_arg: OrganizationId) -> RepoResult<Option<MerchantCoupon>> {
            if organization_id_arg != MOCK_ORGANIZATION_ID {
                return Ok(None);
            }
            Ok(create_merchant_coupon(&code_arg.normalize().0))
        }

        fn find_by(&self, search: MerchantCouponSearch) -> RepoResult<Vec<MerchantCoupon>> {
            let coupons = merchant_coupon_codes().into_iter().filter_map(create_merchant_coupon);
            match search {
                MerchantCouponSearch::Organization(organization_id) => {
                    Ok(coupons.filter(|coupon| coupon.organization_id == organization_id).collect())
                }
                MerchantCouponSearch::AiAuthorized(organization_id) => Ok(coupons
                    .filter(|coupon| {
                        coupon.organization_id == organization_id && coupon.ai_authorized && coupon.status == CouponStatus::Active
                    }).collect()),
            }
        }

        fn update(&self, id_arg: CouponId, payload: UpdateMerchantCoupon) -> RepoResult<MerchantCoupon> {
            let coupon = merchant_coupon_codes()
                .into_iter()
                .filter_map(create_merchant_coupon)
                .find(|coupon| coupon.id == id_arg)
                .unwrap_or_else(|| base_merchant_coupon(id_arg.0, "SAVE20"));

            Ok(MerchantCoupon {
                description: payload.description.or(coupon.description),
                status: payload.status.unwrap_or(coupon.status),
                value: payload.value.unwrap_or(coupon.value),
                min_purchase: payload.min_purchase.or(coupon.min_purchase),
                max_discount: payload.max_discount.or(coupon.max_discount),
                applies_to: payload.applies_to.unwrap_or(coupon.applies_to),
                product_ids: payload.product_ids.or(coupon.product_ids),
                max_uses: payload.max_uses.or(coupon.max_uses),
                max_uses_per_customer: payload.max_uses_per_customer.or(coupon.max_uses_per_customer),
                valid_until: payload.valid_until.or(coupon.valid_until),
                ai_authorized: payload.ai_authorized.unwrap_or(coupon.ai_authorized),
                ai_discount_limit: payload.ai_discount_limit.or(coupon.ai_discount_limit),
                coupon_category: payload.coupon_category.or(coupon.coupon_category),
                ai_trigger_keywords: payload.ai_trigger_keywords.or(coupon.ai_trigger_keywords),
                ..coupon
            })
        }

        fn register_use(&self, id_arg: CouponId) -> RepoResult<bool> {
            // VIP10 is already at its cap
            Ok(id_arg != CouponId(3))
        }
    }

    #[derive(Clone, Default)]
    pub struct PlatformCouponsRepoMock;

    impl PlatformCouponsRepo for PlatformCouponsRepoMock {
        fn create(&self, payload: NewPlatformCoupon) -> RepoResult<PlatformCoupon> {
            Ok(PlatformCoupon {
                id: CouponId(1),
                code: payload.code.normalize(),
                description: payload.description,
                status: CouponStatus::Active,
                discount_type: payload.discount_type,
                value: payload.value,
                applies_to_plans: payload.applies_to_plans,
                billing_cycles: payload.billing_cycles,
                is_free_forever: payload.is_free_forever,
                max_uses: payload.max_uses,
                current_uses: 0,
                valid_from: payload.valid_from,
                valid_until: payload.valid_until,
                created_by: payload.created_by,
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            })
        }

        fn list(&self) -> RepoResult<Vec<PlatformCoupon>> {
            Ok(platform_coupon_codes().into_iter().filter_map(create_platform_coupon).collect())
        }

        fn get(&self, id_arg: CouponId) -> RepoResult<Option<PlatformCoupon>> {
            Ok(platform_coupon_codes()
                .into_iter()
                .filter_map(create_platform_coupon)
                .find(|coupon| coupon.id == id_arg))
        }

        fn get_by_code(&self, code_arg: CouponCode) -> RepoResult<Option<PlatformCoupon>> {
            Ok(create_platform_coupon(&code_arg.normalize().0))
        }

        fn register_use(&self, _id_arg: CouponId) -> RepoResult<bool> {
            Ok(true)
        }
    }

    #[derive(Clone, Default)]
    pub struct RedemptionsRepoMock;

    impl RedemptionsRepo for RedemptionsRepoMock {
        fn create(&self, payload: NewRedemption) -> RepoResult<Redemption> {
            Ok(Redemption {
                id: payload.id,
                coupon_id: payload.coupon_id,
                coupon_scope: payload.coupon_scope,
                coupon_code: payload.coupon_code,
                organization_id: payload.organization_id,
                customer_id: payload.customer_id,
                original_amount: payload.original_amount,
                discount_amount: payload.discount_amount,
                final_amount: payload.final_amount,
                applied_by: payload.applied_by,
                agent_id: payload.agent_id,
                order_id: payload.order_id,
                redeemed_at: SystemTime::now(),
            })
        }

        fn find_by(&self, search: RedemptionSearch) -> RepoResult<Vec<Redemption>> {
            let mock_redemption = |coupon_id: i32, code: &str, discount: f64| Redemption {
                id: RedemptionId::new(),
                coupon_id: CouponId(coupon_id),
                coupon_scope: CouponScope::Merchant,
                coupon_code: CouponCode(code.to_string()),
                organization_id: MOCK_ORGANIZATION_ID,
                customer_id: Some(MOCK_CUSTOMER_ID),
                original_amount: Amount(150.0),
                discount_amount: Amount(discount),
                final_amount: Amount(150.0 - discount),
                applied_by: AppliedBy::User,
                agent_id: None,
                order_id: Some("order-1".to_string()),
                redeemed_at: SystemTime::now(),
            };
            match search {
                RedemptionSearch::Organization(organization_id) if organization_id == MOCK_ORGANIZATION_ID => Ok(vec![
                    mock_redemption(1, "SAVE20", 30.0),
                    mock_redemption(1, "SAVE20", 20.0),
                    mock_redemption(2, "WELCOME5", 5.0),
                ]),
                RedemptionSearch::Organization(_) => Ok(vec![]),
                RedemptionSearch::Coupon(coupon_id, _) if coupon_id == CouponId(1) => {
                    Ok(vec![mock_redemption(1, "SAVE20", 30.0), mock_redemption(1, "SAVE20", 20.0)])
                }
                RedemptionSearch::Coupon(..) => Ok(vec![]),
            }
        }

        fn count_for_customer(&self, _coupon_id_arg: CouponId, customer_id_arg: CustomerId) -> RepoResult<i64> {
            if customer_id_arg == MOCK_LIMITED_CUSTOMER_ID {
                Ok(1)
            } else {
                Ok(0)
            }
        }
    }

    #[derive(Clone, Default)]
    pub struct OrganizationsRepoMock;

    impl OrganizationsRepo for OrganizationsRepoMock {
        fn get(&self, id_arg: OrganizationId) -> RepoResult<Option<Organization>> {
            if id_arg.0 > 100 {
                return Ok(None);
            }
            Ok(Some(create_organization(id_arg)))
        }

        fn activate_free_forever(&self, id_arg: OrganizationId, coupon_code_arg: CouponCode) -> RepoResult<Organization> {
            let organization = create_organization(id_arg);
            Ok(Organization {
                status: OrganizationStatus::ActiveInternal,
                subscription_status: SubscriptionStatus::Active,
                is_internal: true,
                stripe_customer_id: None,
                stripe_subscription_id: None,
                activated_with_coupon: Some(coupon_code_arg),
                activated_at: Some(SystemTime::now()),
                ..organization
            })
        }
    }

    #[derive(Clone, Default)]
    pub struct AiDiscountRequestsRepoMock;

    impl AiDiscountRequestsRepo for AiDiscountRequestsRepoMock {
        fn create(&self, payload: NewAiDiscountRequest) -> RepoResult<AiDiscountRequest> {
            Ok(AiDiscountRequest {
                id: payload.id,
                organization_id: payload.organization_id,
                agent_id: payload.agent_id,
                conversation_id: payload.conversation_id,
                requested_discount: payload.requested_discount,
                coupon_code: payload.coupon_code,
                status: payload.status,
                customer_context: payload.customer_context,
                created_at: SystemTime::now(),
                resolved_at: payload.resolved_at,
            })
        }

        fn find_by_organization(&self, _organization_id_arg: OrganizationId) -> RepoResult<Vec<AiDiscountRequest>> {
            Ok(vec![])
        }
    }

    #[derive(Clone, Default)]
    pub struct PricingPlansRepoMock;

    impl PricingPlansRepo for PricingPlansRepoMock {
        fn create(&self, payload: NewPricingPlan) -> RepoResult<PricingPlan> {
            Ok(PricingPlan {
                id: 1,
                plan_id: payload.plan_id,
                name: payload.name,
                monthly_price: payload.monthly_price,
                yearly_price: payload.yearly_price,
                display_order: payload.display_order,
                is_active: payload.is_active,
                is_public: payload.is_public,
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            })
        }

        fn get_by_plan_id(&self, plan_id_arg: PlanId) -> RepoResult<Option<PricingPlan>> {
            let plan = |id: i32, plan_id: &str, name: &str, monthly: f64, yearly: f64, public: bool| PricingPlan {
                id,
                plan_id: PlanId(plan_id.to_string()),
                name: name.to_string(),
                monthly_price: Amount(monthly),
                yearly_price: Amount(yearly),
                display_order: id,
                is_active: true,
                is_public: public,
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            };
            Ok(match plan_id_arg.0.as_ref() {
                "starter" => Some(plan(1, "starter", "Starter", 29.0, 290.0, true)),
                "pro" => Some(plan(2, "pro", "Pro", 99.0, 990.0, true)),
                "partner" => Some(plan(3, "partner", "Partner", 0.0, 0.0, false)),
                _ => None,
            })
        }

        fn list_public(&self) -> RepoResult<Vec<PricingPlan>> {
            let mut plans = vec![];
            for plan_id in &["starter", "pro"] {
                if let Some(plan) = self.get_by_plan_id(PlanId(plan_id.to_string()))? {
                    plans.push(plan);
                }
            }
            Ok(plans)
        }

        fn update(&self, plan_id_arg: PlanId, payload: UpdatePricingPlan) -> RepoResult<PricingPlan> {
            let plan = self
                .get_by_plan_id(plan_id_arg)?
                .ok_or_else(|| format_err!("Plan not found"))?;
            Ok(PricingPlan {
                name: payload.name.unwrap_or(plan.name.clone()),
                monthly_price: payload.monthly_price.unwrap_or(plan.monthly_price),
                yearly_price: payload.yearly_price.unwrap_or(plan.yearly_price),
                display_order: payload.display_order.unwrap_or(plan.display_order),
                is_active: payload.is_active.unwrap_or(plan.is_active),
                is_public: payload.is_public.unwrap_or(plan.is_public),
                ..plan
            })
        }
    }

    #[derive(Clone, Default)]
    pub struct UserRolesRepoMock;

    impl UserRolesRepo for UserRolesRepoMock {
        fn list_for_user(&self, user_id_arg: UserId) -> RepoResult<Vec<Role>> {
            Ok(match user_id_arg.0 {
                1 => vec![Role::Superuser],
                _ => vec![Role::User],
            })
        }

        fn create(&self, payload: NewUserRole) -> RepoResult<UserRole> {
            Ok(UserRole {
                id: 1,
                user_id: payload.user_id,
                name: payload.name,
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            })
        }

        fn delete_by_user_id(&self, user_id_arg: UserId) -> RepoResult<Vec<UserRole>> {
            Ok(vec![UserRole {
                id: 1,
                user_id: user_id_arg,
                name: Role::User,
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            }])
        }
    }

    #[derive(Default)]
    pub struct MockConnection {
        tr: AnsiTransactionManager,
    }

    impl Connection for MockConnection {
        type Backend = Pg;
        type TransactionManager = AnsiTransactionManager;

        fn establish(_database_url: &str) -> ConnectionResult<MockConnection> {
            Ok(MockConnection::default())
        }

        fn execute(&self, _query: &str) -> QueryResult<usize> {
            unimplemented!()
        }

        fn query_by_index<T, U>(&self, _source: T) -> QueryResult<Vec<U>>
        where
            T: AsQuery,
            T::Query: QueryFragment<Pg> + QueryId,
            Pg: HasSqlType<T::SqlType>,
            U: Queryable<T::SqlType, Pg>,
        {
            unimplemented!()
        }

        fn query_by_name<T, U>(&self, _source: &T) -> QueryResult<Vec<U>>
        where
            T: QueryFragment<Pg> + QueryId,
            U: QueryableByName<Pg>,
        {
            unimplemented!()
        }

        fn execute_returning_count<T>(&self, _source: &T) -> QueryResult<usize>
        where
            T: QueryFragment<Pg> + QueryId,
        {
            unimplemented!()
        }

        fn transaction_manager(&self) -> &Self::TransactionManager {
            &self.tr
        }
    }

    impl SimpleConnection for MockConnection {
        fn batch_execute(&self, _query: &str) -> QueryResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockConnectionManager;

    impl ManageConnection for MockConnectionManager {
        type Connection = MockConnection;
        type Error = MockError;

        fn connect(&self) -> Result<MockConnection, MockError> {
            Ok(MockConnection::default())
        }

        fn is_valid(&self, _conn: &mut MockConnection) -> Result<(), MockError> {
            Ok(())
        }

        fn has_broken(&self, _conn: &mut MockConnection) -> bool {
            false
        }
    }

    #[derive(Debug)]
    pub struct MockError {}

    impl fmt::Display for MockError {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "mock connection failure")
        }
    }

    impl Error for MockError {
        fn description(&self) -> &str {
            "mock connection failure"
        }

        fn cause(&self) -> Option<&Error> {
            None
        }
    }
}
