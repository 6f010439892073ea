use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        candidate::CandidateView,
        election::{ElectionSummary, WinnerResponse},
        pagination::{Paginated, PaginationRequest},
    },
    common::election::ElectionId,
    registry::ElectionRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![election, candidates, winner]
}

#[get("/elections/<election_id>")]
async fn election(
    election_id: ElectionId,
    registry: &State<ElectionRegistry>,
) -> Result<Json<ElectionSummary>> {
    let election = registry.get(election_id).await?;
    Ok(Json(ElectionSummary::at(&election, registry.now())))
}

#[get("/elections/<election_id>/candidates?<pagination..>")]
async fn candidates(
    election_id: ElectionId,
    pagination: PaginationRequest,
    registry: &State<ElectionRegistry>,
) -> Result<Json<Paginated<CandidateView>>> {
    let (election, candidates) = registry.list_candidates(election_id).await?;
    let views = CandidateView::list(&election, &candidates);
    Ok(Json(pagination.paginate(views)?))
}

#[get("/elections/<election_id>/winner")]
async fn winner(
    election_id: ElectionId,
    registry: &State<ElectionRegistry>,
) -> Result<Json<WinnerResponse>> {
    let winner = registry.get_winner(election_id).await?;
    Ok(Json(WinnerResponse { winner }))
}
