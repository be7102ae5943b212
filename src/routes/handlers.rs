use std::time::{Duration, Instant};

use serde_json::Value;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::BackendError;
use crate::log::debug;
use crate::routes::{
    query::SearchQuery,
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::talker::Talker;
use crate::{token, validation};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

/// External health-check contract: always 200 with an empty body.
pub async fn root(_environment: Environment) -> RouteResult {
    timed! {
        StatusCode::OK
    }
}

pub async fn list(environment: Environment) -> RouteResult {
    timed! {
        let talkers = environment
            .db
            .retrieve_all()
            .await
            .map_err(|e: BackendError| Rejection::new(Context::list(), e))?;

        json(&talkers)
    }
}

pub async fn search(environment: Environment, query: SearchQuery) -> RouteResult {
    timed! {
        let SearchQuery { q } = query;
        let term = q.unwrap_or_default();

        let error_handler = |e: BackendError| Rejection::new(Context::search(term.clone()), e);

        debug!(environment.logger, "Searching talkers..."; "q" => &term);

        let talkers = environment
            .db
            .retrieve_all()
            .await
            .map_err(&error_handler)?;

        // Case-sensitive substring match; the empty term matches everyone.
        let matches: Vec<Talker> = talkers
            .into_iter()
            .filter(|t| t.name().contains(&term))
            .collect();

        json(&matches)
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        debug!(environment.logger, "Retrieving talker..."; "id" => &id);

        let talker = find_by_raw_id(&environment, &id)
            .await
            .map_err(&error_handler)?
            .ok_or_else(|| error_handler(BackendError::TalkerNotFound))?;

        with_status(json(&talker), StatusCode::OK)
    }
}

pub async fn login(environment: Environment, payload: Value) -> RouteResult {
    timed! {
        validation::validate_login(&payload)
            .map_err(|e: BackendError| Rejection::new(Context::login(), e))?;

        let token = token::issue();
        debug!(environment.logger, "Issuing login token...");

        json(&SuccessResponse::Token { token })
    }
}

pub async fn create(environment: Environment, payload: Value) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::create(), e);

        let new = validation::validate_talker(&payload).map_err(&error_handler)?;

        let id = environment.allocator.next();
        debug!(environment.logger, "Creating talker..."; "id" => id);

        let talker = Talker::from_new(id, new);
        environment
            .db
            .insert(talker.clone())
            .await
            .map_err(&error_handler)?;

        with_status(json(&talker), StatusCode::CREATED)
    }
}

pub async fn update(environment: Environment, id: String, payload: Value) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::update(id.clone()), e);

        let new = validation::validate_talker(&payload).map_err(&error_handler)?;

        debug!(environment.logger, "Updating talker..."; "id" => &id);

        // The path parameter decides the ID; any `id` in the body was
        // dropped during validation.
        let updated = match id.parse::<u64>() {
            Ok(numeric) => environment
                .db
                .update(numeric, new)
                .await
                .map_err(&error_handler)?,
            Err(_) => None,
        };

        let talker = updated.ok_or_else(|| error_handler(BackendError::TalkerNotFound))?;

        with_status(json(&talker), StatusCode::OK)
    }
}

pub async fn delete(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::delete(id.clone()), e);

        debug!(environment.logger, "Deleting talker..."; "id" => &id);

        let removed = match id.parse::<u64>() {
            Ok(numeric) => environment.db.delete(numeric).await.map_err(&error_handler)?,
            Err(_) => None,
        };

        removed.ok_or_else(|| error_handler(BackendError::TalkerNotFound))?;

        StatusCode::NO_CONTENT
    }
}

// A non-numeric ID can never match a record, so it reads as absent
// rather than malformed.
async fn find_by_raw_id(
    environment: &Environment,
    id: &str,
) -> Result<Option<Talker>, BackendError> {
    match id.parse::<u64>() {
        Ok(numeric) => environment.db.retrieve(numeric).await,
        Err(_) => Ok(None),
    }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
