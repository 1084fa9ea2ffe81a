use chrono::Utc;
use dataplug_engine::{
    db_types::{
        Agent,
        AgentStatus,
        NewAgent,
        NewOrder,
        NewTransaction,
        Order,
        OrderId,
        OrderStatusType,
        Package,
        PriceOverrides,
        Transaction,
        TransactionPurpose,
        TransactionStatus,
    },
    traits::{
        AgentApiError,
        AgentManagement,
        CatalogApiError,
        CatalogManagement,
        OrderFlowError,
        ProviderFulfillment,
        SettlementOutcome,
        StorefrontDatabase,
    },
};
use dp_common::Cedis;
use mockall::mock;
use sqlx::types::Json;

mock! {
    pub ShopDb {}
    impl AgentManagement for ShopDb {
        async fn fetch_agent_by_slug(&self, slug: &str) -> Result<Option<Agent>, AgentApiError>;
        async fn fetch_agent_by_auth_uid(&self, auth_uid: &str) -> Result<Option<Agent>, AgentApiError>;
        async fn insert_agent(&self, agent: NewAgent) -> Result<Agent, AgentApiError>;
        async fn update_price_overrides(&self, agent_id: i64, overrides: PriceOverrides) -> Result<Agent, AgentApiError>;
        async fn activate_agent(&self, agent_id: i64) -> Result<Option<Agent>, AgentApiError>;
        async fn fetch_orders_for_agent(&self, agent_id: i64) -> Result<Vec<Order>, AgentApiError>;
    }
    impl CatalogManagement for ShopDb {
        async fn fetch_active_packages(&self) -> Result<Vec<Package>, CatalogApiError>;
        async fn fetch_package(&self, package_id: &str) -> Result<Option<Package>, CatalogApiError>;
    }
    impl StorefrontDatabase for ShopDb {
        fn url(&self) -> &str;
        async fn create_checkout(&self, order: NewOrder, transaction: NewTransaction) -> Result<(Order, Transaction), OrderFlowError>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, OrderFlowError>;
        async fn fetch_transaction_for_order(&self, order_id: &OrderId) -> Result<Option<Transaction>, OrderFlowError>;
        async fn insert_transaction(&self, transaction: NewTransaction) -> Result<Transaction, OrderFlowError>;
        async fn fail_order(&self, reference: &str) -> Result<Transaction, OrderFlowError>;
        async fn fail_transaction(&self, reference: &str) -> Result<Transaction, OrderFlowError>;
        async fn park_order_for_fulfillment(&self, reference: &str) -> Result<Order, OrderFlowError>;
        async fn complete_order_and_settle(&self, reference: &str, fulfillment: ProviderFulfillment) -> Result<SettlementOutcome, OrderFlowError>;
        async fn fetch_orders_awaiting_fulfillment(&self, limit: i64) -> Result<Vec<Order>, OrderFlowError>;
        async fn complete_activation(&self, reference: &str) -> Result<Agent, OrderFlowError>;
    }
}

pub fn test_agent(status: AgentStatus) -> Agent {
    let now = Utc::now();
    Agent {
        id: 1,
        auth_uid: "uid-1".to_string(),
        email: "ama@example.com".to_string(),
        name: "Ama Mensah".to_string(),
        business_name: "Ama Data Hub".to_string(),
        phone: "0244000001".to_string(),
        slug: "ama-data-hub-x1y2".to_string(),
        status,
        price_overrides: Json(PriceOverrides::new()),
        total_earned: Cedis::from(0),
        balance: Cedis::from(0),
        total_orders: 0,
        activated_at: (status == AgentStatus::Activated).then_some(now),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_package(id: &str, base_price: i64) -> Package {
    Package {
        id: id.to_string(),
        name: format!("MTN {id}"),
        network: "MTN".to_string(),
        capacity: "1GB".to_string(),
        base_price: Cedis::from(base_price),
        active: true,
    }
}

pub fn test_order(status: OrderStatusType) -> Order {
    let now = Utc::now();
    Order {
        id: 1,
        order_id: OrderId("ord_1715000000000_abc123".to_string()),
        agent_id: 1,
        customer_phone: "0551234567".to_string(),
        customer_email: None,
        package_id: "mtn-1gb".to_string(),
        package_name: "MTN 1GB".to_string(),
        network: "MTN".to_string(),
        capacity: "1GB".to_string(),
        base_price: Cedis::from(400),
        sale_price: Cedis::from(600),
        commission: Cedis::from(200),
        status,
        provider_order_id: None,
        provider_status: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_transaction(status: TransactionStatus, purpose: TransactionPurpose) -> Transaction {
    let now = Utc::now();
    Transaction {
        id: 1,
        reference: "order_1715000000000_ref001".to_string(),
        purpose,
        order_id: (purpose == TransactionPurpose::Order).then(|| OrderId("ord_1715000000000_abc123".to_string())),
        agent_id: 1,
        amount: Cedis::from(600),
        status,
        created_at: now,
        updated_at: now,
    }
}
