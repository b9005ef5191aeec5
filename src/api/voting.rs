use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::logging::RequestId;
use crate::model::{
    api::{BallotRequest, CastReceipt, ValidationReport},
    common::VoterId,
    store::BallotStore,
    validation::Validation,
};

pub fn routes() -> Vec<Route> {
    routes![validate_ballot, cast_ballot]
}

/// Dry run: report every problem with the batch without recording anything.
#[post("/ballots/validate", data = "<ballot>", format = "json")]
async fn validate_ballot(
    ballot: Json<BallotRequest>,
    store: &State<BallotStore>,
) -> Result<Json<ValidationReport>> {
    match store
        .validate_batch(&ballot.voter_id, &ballot.selections)
        .await
    {
        Validation::Valid => Ok(Json(ValidationReport::accepted())),
        Validation::Invalid(errors) => Ok(Json(ValidationReport::rejected(errors))),
        Validation::NothingSelected => Err(Error::NothingSelected),
    }
}

/// Validate and commit a batch. The store repeats its own checks under the
/// write lock, so a race with another cast surfaces as a conflict.
#[post("/ballots/cast", data = "<ballot>", format = "json")]
async fn cast_ballot(
    request_id: &RequestId,
    ballot: Json<BallotRequest>,
    store: &State<BallotStore>,
) -> Result<Json<CastReceipt>> {
    let BallotRequest {
        voter_id,
        selections,
    } = ballot.into_inner();

    match store.validate_batch(&voter_id, &selections).await {
        Validation::Valid => {}
        Validation::Invalid(errors) => {
            debug!("req{request_id}: ballot for {voter_id} failed validation");
            return Err(Error::Rejected(errors));
        }
        Validation::NothingSelected => return Err(Error::NothingSelected),
    }

    // Valid batches always carry a well-formed ID.
    let voter_id = VoterId::parse(&voter_id)
        .map_err(|err| Error::Status(Status::UnprocessableEntity, err.to_string()))?;
    let votes = store.commit_batch(&voter_id, &selections).await?;
    debug!("req{request_id}: committed {} vote(s)", votes.len());
    Ok(Json(CastReceipt::new(votes)))
}
