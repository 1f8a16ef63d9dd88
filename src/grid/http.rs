//! Axum adapter
//!
//! [`GridValues`] collects the raw request values of a grid request from the
//! query string and a url-encoded form body. Replies and errors convert into
//! axum responses.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn products(
//!     State(engine): State<Arc<ProductGrid>>,
//!     values: GridValues,
//! ) -> Response {
//!     engine.respond(values).await
//! }
//!
//! let app = Router::new()
//!     .route("/products/grid", post(products))
//!     .with_state(Arc::new(engine));
//! ```

use super::engine::GridEngine;
use super::response::GridReply;
use crate::config::GetPolicy;
use crate::core::entity::{HasSchema, Record, RowModel};
use crate::core::error::GridError;
use crate::core::request::RequestValues;
use crate::core::store::DataSource;
use crate::core::validation::Binder;
use axum::{
    Form, Json,
    extract::{FromRequest, Query, Request},
    http::{Method, header},
    response::{IntoResponse, Response},
};

/// Raw values of a grid request with the method it arrived with
#[derive(Debug, Clone)]
pub struct GridValues {
    pub method: Method,
    pub values: RequestValues,
}

impl GridValues {
    pub fn new(method: Method, values: RequestValues) -> Self {
        Self { method, values }
    }

    /// Refuse GET requests unless the policy allows them
    pub fn ensure_allowed(&self, policy: GetPolicy) -> Result<(), GridError> {
        if self.method == Method::GET && policy == GetPolicy::Deny {
            return Err(GridError::MethodNotAllowed {
                method: self.method.to_string(),
            });
        }
        Ok(())
    }
}

impl<S> FromRequest<S> for GridValues
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();

        let Query(query): Query<Vec<(String, String)>> =
            Query::try_from_uri(req.uri()).map_err(IntoResponse::into_response)?;
        let mut values: RequestValues = query.into_iter().collect();

        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        // form fields win over query parameters of the same name
        if is_form && method != Method::GET && method != Method::HEAD {
            let Form(form): Form<Vec<(String, String)>> = Form::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            values.extend(form);
        }

        Ok(Self { method, values })
    }
}

impl IntoResponse for GridReply {
    fn into_response(self) -> Response {
        match self {
            GridReply::List(response) => Json(response).into_response(),
            GridReply::Ack { status, ack } => (status, Json(ack)).into_response(),
            GridReply::Status { status, body } if body.is_empty() => status.into_response(),
            GridReply::Status { status, body } => (status, body).into_response(),
        }
    }
}

impl<Row, R, S, B> GridEngine<Row, R, S, B>
where
    Row: RowModel<R> + HasSchema<Key = R::Key>,
    R: Record + Default,
    S: DataSource<R>,
    B: Binder,
{
    /// Enforce the GET policy, run the request and convert the outcome
    pub async fn respond(&self, request: GridValues) -> Response {
        if let Err(e) = request.ensure_allowed(self.config().get_policy) {
            return e.into_response();
        }
        match self.execute(&request.values).await {
            Ok(reply) => reply.into_response(),
            Err(e) => e.into_response(),
        }
    }
}
