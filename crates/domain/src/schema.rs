diesel::table! {
    app_users (id) {
        id -> Uuid,
        email -> Text,
        display_name -> Nullable<Text>,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    plans (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        price_minor -> Int4,
        currency -> Text,
        billing_cycle -> Text,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    subscriptions (id) {
        id -> Uuid,
        user_id -> Uuid,
        plan_id -> Uuid,
        status -> Text,
        starts_at -> Nullable<Timestamptz>,
        ends_at -> Nullable<Timestamptz>,
        auto_renew -> Bool,
        trial_ends_at -> Nullable<Timestamptz>,
        canceled_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    orders (id) {
        id -> Uuid,
        order_number -> Text,
        user_id -> Uuid,
        plan_id -> Uuid,
        subscription_id -> Nullable<Uuid>,
        amount_minor -> Int4,
        currency -> Text,
        status -> Text,
        payment_method -> Text,
        payment_id -> Nullable<Text>,
        payment_data -> Jsonb,
        paid_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    invoices (id) {
        id -> Uuid,
        invoice_number -> Text,
        order_id -> Uuid,
        user_id -> Uuid,
        amount_minor -> Int4,
        tax_amount_minor -> Int4,
        total_amount_minor -> Int4,
        currency -> Text,
        issued_at -> Timestamptz,
        paid_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    audit_logs (id) {
        id -> Int8,
        user_id -> Nullable<Uuid>,
        action -> Text,
        resource_type -> Text,
        resource_id -> Text,
        description -> Text,
        metadata -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    jobs (id) {
        id -> Int8,
        #[sql_name = "type"]
        type_ -> Text,
        payload -> Jsonb,
        run_at -> Timestamptz,
        attempts -> Int4,
        locked_at -> Nullable<Timestamptz>,
        locked_by -> Nullable<Text>,
        error -> Nullable<Text>,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(subscriptions -> plans (plan_id));
diesel::joinable!(subscriptions -> app_users (user_id));
diesel::joinable!(orders -> plans (plan_id));
diesel::joinable!(orders -> subscriptions (subscription_id));
diesel::joinable!(orders -> app_users (user_id));
diesel::joinable!(invoices -> orders (order_id));
diesel::joinable!(invoices -> app_users (user_id));
diesel::joinable!(audit_logs -> app_users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    app_users,
    plans,
    subscriptions,
    orders,
    invoices,
    audit_logs,
    jobs,
);
