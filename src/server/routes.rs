use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use crate::server::{html, AppState};
use crate::model::{NewPerson, NewRecord, RoleDetails};
use crate::{EntityKind, Error, Fields, RefOption, SqliteStore};
use std::sync::Arc;

/// Error page response with a status derived from the failure kind
#[derive(Debug)]
pub struct RouteError {
    pub status: StatusCode,
    pub message: String,
}

impl RouteError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<Error> for RouteError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::MissingField { .. } | Error::InvalidField { .. } => StatusCode::BAD_REQUEST,
            Error::ConstraintViolation(_) => StatusCode::CONFLICT,
            Error::UnknownEntity(_) => StatusCode::NOT_FOUND,
            Error::ConnectionFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Storage(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} {}", self.status, self.message);
        } else {
            tracing::warn!("{} {}", self.status, self.message);
        }
        (self.status, Html(html::error_page(self.status, &self.message))).into_response()
    }
}

/// Open a store for the duration of one request and run `f` against it on
/// the blocking pool. The connection is dropped when `f` returns, whatever
/// the outcome.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, RouteError>
where
    F: FnOnce(&mut SqliteStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let path = state.database_path.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut store = SqliteStore::open(&path)?;
        f(&mut store)
    })
    .await
    .map_err(|e| RouteError::internal(format!("store task failed: {}", e)))?;

    outcome.map_err(RouteError::from)
}

pub async fn home() -> Redirect {
    Redirect::to("/about-us")
}

pub async fn about_us() -> Html<String> {
    Html(html::about_page())
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    kind: EntityKind,
) -> Result<Html<String>, RouteError> {
    let listing = with_store(&state, move |store| store.list_with_relations(kind)).await?;
    Ok(Html(html::listing_page(&listing)))
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    kind: EntityKind,
) -> Result<Html<String>, RouteError> {
    let options = with_store(&state, move |store| reference_options(store, kind)).await?;
    Ok(Html(html::form_page(kind, &options)))
}

pub async fn create_submit(
    State(state): State<Arc<AppState>>,
    kind: EntityKind,
    Form(fields): Form<Fields>,
) -> Result<Redirect, RouteError> {
    let id = with_store(&state, move |store| submit(store, kind, &fields)).await?;
    tracing::debug!("{} {} created via form", kind, id);
    Ok(Redirect::to(&kind.listing_path()))
}

/// Dropdown entries for every foreign-key field of `kind`
fn reference_options(
    store: &mut SqliteStore,
    kind: EntityKind,
) -> crate::Result<Vec<(&'static str, Vec<RefOption>)>> {
    kind.references()
        .iter()
        .map(|(field, target)| Ok((*field, store.reference_options(*target)?)))
        .collect()
}

/// Insert one submitted form. A person form carrying a `role` also creates
/// the role row in the same transaction.
fn submit(store: &mut SqliteStore, kind: EntityKind, fields: &Fields) -> crate::Result<i64> {
    if kind != EntityKind::Person {
        return store.create(kind, fields);
    }

    let person = NewPerson::from_fields(fields)?;
    match RoleDetails::from_fields(fields)? {
        Some(role) => {
            let (person_id, _) = store.create_person_with_role(&person, role)?;
            Ok(person_id)
        }
        None => store.insert(&NewRecord::Person(person)),
    }
}
