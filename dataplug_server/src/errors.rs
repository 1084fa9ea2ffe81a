use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use dataplug_engine::{
    traits::{AgentApiError, CatalogApiError, OrderFlowError},
    AgentFlowError,
    CheckoutError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("This shop is not open for sales.")]
    ShopNotOpen,
    #[error("This account is not permitted to do that. {0}")]
    NotPermitted(String),
    #[error("A record with the same identifier already exists. {0}")]
    AlreadyExists(String),
    #[error("The payment gateway could not be reached. {0}")]
    PaymentGatewayError(String),
    #[error("The payment was not completed. {0}")]
    PaymentNotCompleted(String),
    #[error("An auth identifier is required for this endpoint.")]
    MissingAuthId,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::PaymentNotCompleted(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::ShopNotOpen => StatusCode::FORBIDDEN,
            Self::NotPermitted(_) => StatusCode::FORBIDDEN,
            Self::MissingAuthId => StatusCode::UNAUTHORIZED,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::Validation(m) => Self::InvalidRequestBody(m),
            CheckoutError::AgentNotFound(slug) => Self::NoRecordFound(format!("No shop exists at '{slug}'.")),
            CheckoutError::AgentNotActivated(_) => Self::ShopNotOpen,
            CheckoutError::PackageNotFound(id) => Self::NoRecordFound(format!("Package '{id}' is not available.")),
            CheckoutError::OrderFlowError(e) => e.into(),
            CheckoutError::AgentError(e) => e.into(),
            CheckoutError::CatalogError(e) => e.into(),
        }
    }
}

impl From<AgentFlowError> for ServerError {
    fn from(e: AgentFlowError) -> Self {
        match e {
            AgentFlowError::Validation(m) => Self::InvalidRequestBody(m),
            AgentFlowError::AgentNotFound => Self::NoRecordFound("Agent does not exist.".to_string()),
            AgentFlowError::AgentAlreadyExists => Self::AlreadyExists(e.to_string()),
            AgentFlowError::AlreadyActivated => Self::AlreadyExists(e.to_string()),
            AgentFlowError::NotActivated => Self::NotPermitted(e.to_string()),
            AgentFlowError::PriceBelowBase(_, _) => Self::InvalidRequestBody(e.to_string()),
            AgentFlowError::UnknownPackage(_) => Self::InvalidRequestBody(e.to_string()),
            AgentFlowError::AgentError(e) => e.into(),
            AgentFlowError::CatalogError(e) => e.into(),
            AgentFlowError::OrderFlowError(e) => e.into(),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DuplicateReference(r) => Self::AlreadyExists(format!("Payment reference '{r}'.")),
            OrderFlowError::ReferenceNotFound(r) => Self::NoRecordFound(format!("Payment reference '{r}'.")),
            OrderFlowError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id}.")),
            OrderFlowError::DatabaseError(m) => Self::BackendError(m),
            OrderFlowError::AgentError(e) => e.into(),
            OrderFlowError::CatalogError(e) => e.into(),
        }
    }
}

impl From<AgentApiError> for ServerError {
    fn from(e: AgentApiError) -> Self {
        match e {
            AgentApiError::AgentNotFound => Self::NoRecordFound("Agent does not exist.".to_string()),
            AgentApiError::AgentAlreadyExists => Self::AlreadyExists(e.to_string()),
            AgentApiError::SlugTaken(_) => Self::AlreadyExists(e.to_string()),
            AgentApiError::PriceBelowBase(_, _) => Self::InvalidRequestBody(e.to_string()),
            AgentApiError::DatabaseError(m) => Self::BackendError(m),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(m) => Self::BackendError(m),
        }
    }
}
