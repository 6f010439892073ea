use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        auth::Caller,
        election::{Application, ApplicationRequest, VoteRequest},
    },
    common::election::ElectionId,
    registry::ElectionRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![apply, vote]
}

#[post("/elections/<election_id>/candidates", data = "<application>", format = "json")]
async fn apply(
    caller: Caller,
    election_id: ElectionId,
    application: Json<ApplicationRequest>,
    registry: &State<ElectionRegistry>,
) -> Result<Json<Application>> {
    let index = registry
        .apply(
            election_id,
            caller.into_identity(),
            application.into_inner().label,
        )
        .await?;
    Ok(Json(Application { index }))
}

#[post("/elections/<election_id>/votes", data = "<ballot>", format = "json")]
async fn vote(
    caller: Caller,
    election_id: ElectionId,
    ballot: Json<VoteRequest>,
    registry: &State<ElectionRegistry>,
) -> Result<()> {
    registry
        .vote(election_id, caller.into_identity(), ballot.candidate)
        .await
}
