use rocket::{serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{BallotDump, CandidateDesc, Paginated, PaginationRequest, ResultsSummary},
    common::Category,
    store::BallotStore,
    vote::Vote,
};

pub fn routes() -> Vec<Route> {
    routes![candidates, candidate, category_votes, results, results_dump]
}

#[get("/candidates?<category>")]
async fn candidates(
    category: Option<Category>,
    store: &State<BallotStore>,
) -> Json<Vec<CandidateDesc>> {
    Json(store.candidates(category).await)
}

#[get("/candidates/<candidate_id>")]
async fn candidate(candidate_id: &str, store: &State<BallotStore>) -> Result<Json<CandidateDesc>> {
    let candidate = store
        .candidate(candidate_id)
        .await
        .ok_or_else(|| Error::not_found(format!("Candidate with ID '{candidate_id}'")))?;
    Ok(Json(candidate))
}

#[get("/categories/<category>/votes?<pagination..>")]
async fn category_votes(
    category: Category,
    pagination: PaginationRequest,
    store: &State<BallotStore>,
) -> Json<Paginated<Vote>> {
    let votes = store.votes_by_category(category).await;
    Json(pagination.paginate(votes))
}

#[get("/results")]
async fn results(store: &State<BallotStore>) -> Json<ResultsSummary> {
    Json(store.summary().await)
}

#[get("/results/dump")]
async fn results_dump(store: &State<BallotStore>) -> Json<BallotDump> {
    Json(store.dump().await)
}
