use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    common::{VoterId, VoterIdError},
    store::BallotStore,
    vote::Vote,
    voter::Voter,
};

pub fn routes() -> Vec<Route> {
    routes![get_voter, register_voter, verify_voter, get_voter_votes]
}

/// Turn a malformed path ID into a response rather than a forward.
fn require_valid(voter_id: std::result::Result<VoterId, VoterIdError>) -> Result<VoterId> {
    voter_id.map_err(|err| Error::Status(Status::UnprocessableEntity, err.to_string()))
}

#[get("/voters/<voter_id>")]
async fn get_voter(
    voter_id: std::result::Result<VoterId, VoterIdError>,
    store: &State<BallotStore>,
) -> Result<Json<Voter>> {
    let voter_id = require_valid(voter_id)?;
    let voter = store
        .find_voter(&voter_id)
        .await
        .ok_or_else(|| Error::not_found(format!("Voter with ID '{voter_id}'")))?;
    Ok(Json(voter))
}

#[post("/voters", data = "<voter>", format = "json")]
async fn register_voter(voter: Json<Voter>, store: &State<BallotStore>) -> Json<Voter> {
    Json(store.register_voter(voter.into_inner()).await)
}

/// Identity lookup: a voter seen for the first time gets a generated profile.
#[post("/voters/<voter_id>/verify")]
async fn verify_voter(
    voter_id: std::result::Result<VoterId, VoterIdError>,
    store: &State<BallotStore>,
) -> Result<Json<Voter>> {
    let voter_id = require_valid(voter_id)?;
    Ok(Json(store.find_or_register(voter_id).await))
}

#[get("/voters/<voter_id>/votes")]
async fn get_voter_votes(
    voter_id: std::result::Result<VoterId, VoterIdError>,
    store: &State<BallotStore>,
) -> Result<Json<Vec<Vote>>> {
    let voter_id = require_valid(voter_id)?;
    if store.find_voter(&voter_id).await.is_none() {
        return Err(Error::not_found(format!("Voter with ID '{voter_id}'")));
    }
    Ok(Json(store.votes_by_voter(&voter_id).await))
}
