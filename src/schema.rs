/// diesel table for merchant_coupons
table! {
    merchant_coupons (id) {
        id -> Integer,
        code -> VarChar,
        organization_id -> Integer,
        description -> Nullable<VarChar>,
        status -> VarChar,
        discount_type -> VarChar,
        value -> Double,
        min_purchase -> Nullable<Double>,
        max_discount -> Nullable<Double>,
        applies_to -> VarChar,
        product_ids -> Nullable<Array<Integer>>,
        max_uses -> Nullable<Integer>,
        current_uses -> Integer,
        max_uses_per_customer -> Nullable<Integer>,
        valid_from -> Timestamp,
        valid_until -> Nullable<Timestamp>,
        ai_authorized -> Bool,
        ai_discount_limit -> Nullable<Double>,
        coupon_category -> Nullable<VarChar>,
        ai_trigger_keywords -> Nullable<Array<VarChar>>,
        created_by -> Nullable<Integer>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

/// diesel table for platform_coupons
table! {
    platform_coupons (id) {
        id -> Integer,
        code -> VarChar,
        description -> Nullable<VarChar>,
        status -> VarChar,
        discount_type -> VarChar,
        value -> Double,
        applies_to_plans -> Nullable<Array<VarChar>>,
        billing_cycles -> Nullable<Array<VarChar>>,
        is_free_forever -> Bool,
        max_uses -> Nullable<Integer>,
        current_uses -> Integer,
        valid_from -> Timestamp,
        valid_until -> Nullable<Timestamp>,
        created_by -> Nullable<Integer>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

/// diesel table for coupon_redemptions
table! {
    coupon_redemptions (id) {
        id -> Uuid,
        coupon_id -> Integer,
        coupon_scope -> VarChar,
        coupon_code -> VarChar,
        organization_id -> Integer,
        customer_id -> Nullable<Integer>,
        original_amount -> Double,
        discount_amount -> Double,
        final_amount -> Double,
        applied_by -> VarChar,
        agent_id -> Nullable<VarChar>,
        order_id -> Nullable<VarChar>,
        redeemed_at -> Timestamp,
    }
}

/// diesel table for ai_discount_requests
table! {
    ai_discount_requests (id) {
        id -> Uuid,
        organization_id -> Integer,
        agent_id -> VarChar,
        conversation_id -> VarChar,
        requested_discount -> Double,
        coupon_code -> Nullable<VarChar>,
        status -> VarChar,
        customer_context -> Nullable<Jsonb>,
        created_at -> Timestamp,
        resolved_at -> Nullable<Timestamp>,
    }
}

/// diesel table for pricing_plans
table! {
    pricing_plans (id) {
        id -> Integer,
        plan_id -> VarChar,
        name -> VarChar,
        monthly_price -> Double,
        yearly_price -> Double,
        display_order -> Integer,
        is_active -> Bool,
        is_public -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

/// diesel table for organizations
table! {
    organizations (id) {
        id -> Integer,
        name -> VarChar,
        owner_id -> Integer,
        status -> VarChar,
        subscription_status -> VarChar,
        is_internal -> Bool,
        is_internal_admin -> Bool,
        ai_max_discount_percentage -> Nullable<Double>,
        ai_human_approval_threshold -> Nullable<Double>,
        ai_can_stack_discounts -> Nullable<Bool>,
        ai_auto_offer_on_hesitation -> Nullable<Bool>,
        ai_auto_offer_on_price_objection -> Nullable<Bool>,
        stripe_customer_id -> Nullable<VarChar>,
        stripe_subscription_id -> Nullable<VarChar>,
        activated_with_coupon -> Nullable<VarChar>,
        activated_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

/// diesel table for user_roles
table! {
    user_roles (id) {
        id -> Integer,
        user_id -> Integer,
        name -> VarChar,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

joinable!(merchant_coupons -> organizations (organization_id));
joinable!(coupon_redemptions -> organizations (organization_id));
joinable!(ai_discount_requests -> organizations (organization_id));

allow_tables_to_appear_in_same_query!(merchant_coupons, platform_coupons, coupon_redemptions, ai_discount_requests, organizations);
