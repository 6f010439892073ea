use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        auth::Caller,
        candidate::CandidateView,
        election::{ElectionCreated, NewElectionRequest, ReviewRequest, WindowRequest, WinnerResponse},
        pagination::{Paginated, PaginationRequest},
    },
    common::election::{CandidateIndex, ElectionId},
    registry::ElectionRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![
        create_election,
        start_review,
        candidates_for_review,
        review_candidate,
        start_voting,
        tally,
    ]
}

#[post("/elections", data = "<request>", format = "json")]
async fn create_election(
    caller: Caller,
    request: Json<NewElectionRequest>,
    registry: &State<ElectionRegistry>,
) -> Result<Json<ElectionCreated>> {
    let request = request.into_inner();
    let id = registry
        .create_election(caller.into_identity(), request.eligibility_source)
        .await?;
    Ok(Json(ElectionCreated { id }))
}

#[post("/elections/<election_id>/review", data = "<window>", format = "json")]
async fn start_review(
    caller: Caller,
    election_id: ElectionId,
    window: Json<WindowRequest>,
    registry: &State<ElectionRegistry>,
) -> Result<()> {
    registry
        .start_review(election_id, caller.identity(), window.duration())
        .await
}

#[get("/elections/<election_id>/candidates/review?<pagination..>")]
async fn candidates_for_review(
    caller: Caller,
    election_id: ElectionId,
    pagination: PaginationRequest,
    registry: &State<ElectionRegistry>,
) -> Result<Json<Paginated<CandidateView>>> {
    let (election, candidates) = registry
        .list_candidates_as_creator(election_id, caller.identity())
        .await?;
    let views = CandidateView::list(&election, &candidates);
    Ok(Json(pagination.paginate(views)?))
}

#[post(
    "/elections/<election_id>/candidates/<index>/review",
    data = "<review>",
    format = "json"
)]
async fn review_candidate(
    caller: Caller,
    election_id: ElectionId,
    index: CandidateIndex,
    review: Json<ReviewRequest>,
    registry: &State<ElectionRegistry>,
) -> Result<()> {
    registry
        .review(election_id, caller.identity(), index, review.decision)
        .await
}

#[post("/elections/<election_id>/voting", data = "<window>", format = "json")]
async fn start_voting(
    caller: Caller,
    election_id: ElectionId,
    window: Json<WindowRequest>,
    registry: &State<ElectionRegistry>,
) -> Result<()> {
    registry
        .start_voting(election_id, caller.identity(), window.duration())
        .await
}

#[post("/elections/<election_id>/tally")]
async fn tally(
    caller: Caller,
    election_id: ElectionId,
    registry: &State<ElectionRegistry>,
) -> Result<Json<WinnerResponse>> {
    let winner = registry.tally(election_id, caller.identity()).await?;
    Ok(Json(WinnerResponse { winner }))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::Status,
        local::asynchronous::Client,
        serde::json::serde_json::json,
    };

    use crate::api::testing::{create_election, get_as, open_window, post_as};
    use crate::clock::ManualClock;
    use crate::model::{
        api::election::ElectionSummary,
        common::election::{Phase, ReviewDecision},
    };

    use super::*;

    async fn summary(client: &Client, id: ElectionId) -> ElectionSummary {
        client
            .get(format!("/elections/{id}"))
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap()
    }

    async fn apply(client: &Client, id: ElectionId, applicant: &str) {
        let response = post_as(
            client,
            applicant,
            format!("/elections/{id}/candidates"),
            json!({ "label": applicant.to_uppercase() }),
        )
        .await;
        assert_eq!(Status::Ok, response.status());
    }

    #[backend_test]
    async fn create_assigns_sequential_ids(client: Client) {
        let first = create_election(&client, "creator", "voter-ids").await;
        let second = create_election(&client, "creator", "voter-ids").await;
        assert_eq!(first + 1, second);

        let summary = summary(&client, second).await;
        assert_eq!(summary.creator.as_str(), "creator");
        assert_eq!(summary.eligibility_source.as_str(), "voter-ids");
        assert_eq!(summary.phase, Phase::Created);
    }

    #[backend_test]
    async fn create_requires_login(client: Client) {
        let response = client
            .post("/elections")
            .header(rocket::http::ContentType::JSON)
            .body(json!({ "eligibility_source": "voter-ids" }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn only_creator_starts_review(client: Client) {
        let id = create_election(&client, "creator", "voter-ids").await;

        let status = open_window(&client, "mallory", id, "review", 60).await;
        assert_eq!(Status::Forbidden, status);
        assert_eq!(summary(&client, id).await.phase, Phase::Created);

        let status = open_window(&client, "creator", id, "review", 60).await;
        assert_eq!(Status::Ok, status);
        assert_eq!(summary(&client, id).await.phase, Phase::Reviewing);

        let status = open_window(&client, "creator", id, "review", 60).await;
        assert_eq!(Status::Conflict, status);
    }

    #[backend_test]
    async fn review_waits_for_applications_to_close(client: Client, clock: ManualClock) {
        let id = create_election(&client, "creator", "voter-ids").await;
        open_window(&client, "creator", id, "review", 10).await;
        apply(&client, id, "alice").await;

        let uri = format!("/elections/{id}/candidates/0/review");
        let response = post_as(&client, "creator", uri.clone(), json!({ "decision": 3 })).await;
        assert_eq!(Status::Conflict, response.status());

        clock.advance_secs(10);
        let response = post_as(&client, "mallory", uri.clone(), json!({ "decision": 3 })).await;
        assert_eq!(Status::Forbidden, response.status());

        let response = post_as(&client, "creator", uri.clone(), json!({ "decision": 3 })).await;
        assert_eq!(Status::Ok, response.status());

        let response = post_as(&client, "creator", uri, json!({ "decision": 3 })).await;
        assert_eq!(Status::Conflict, response.status());

        let response = post_as(
            &client,
            "creator",
            format!("/elections/{id}/candidates/5/review"),
            json!({ "decision": 3 }),
        )
        .await;
        assert_eq!(Status::NotFound, response.status());

        let summary = summary(&client, id).await;
        assert_eq!(summary.phase, Phase::ReviewClosed);
        assert_eq!(summary.reviewed_count, 1);
    }

    #[backend_test]
    async fn creator_sees_unreviewed_candidates(client: Client, clock: ManualClock) {
        let id = create_election(&client, "creator", "voter-ids").await;
        open_window(&client, "creator", id, "review", 10).await;
        for applicant in ["alice", "bob", "carol"] {
            apply(&client, id, applicant).await;
        }
        clock.advance_secs(10);
        post_as(
            &client,
            "creator",
            format!("/elections/{id}/candidates/1/review"),
            json!({ "decision": 4 }),
        )
        .await;

        let uri = format!("/elections/{id}/candidates/review?page_num=1&page_size=2");
        let response = get_as(&client, "alice", uri.clone()).await;
        assert_eq!(Status::Forbidden, response.status());

        let page: Paginated<CandidateView> =
            get_as(&client, "creator", uri).await.into_json().await.unwrap();
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.items.len(), 2);
        assert!(!page.items[0].reviewed);
        assert_eq!(page.items[1].decision, Some(ReviewDecision(4)));
        assert_eq!(page.items[1].votes, None);

        // Public listing stays closed until every candidate is vetted.
        let response = client
            .get(format!("/elections/{id}/candidates"))
            .dispatch()
            .await;
        assert_eq!(Status::Conflict, response.status());
    }

    #[backend_test]
    async fn voting_needs_every_candidate_reviewed(client: Client, clock: ManualClock) {
        let id = create_election(&client, "creator", "voter-ids").await;
        assert_eq!(
            Status::Conflict,
            open_window(&client, "creator", id, "voting", 10).await
        );

        open_window(&client, "creator", id, "review", 10).await;
        apply(&client, id, "alice").await;
        assert_eq!(
            Status::Conflict,
            open_window(&client, "creator", id, "voting", 10).await
        );

        clock.advance_secs(10);
        assert_eq!(
            Status::Conflict,
            open_window(&client, "creator", id, "voting", 10).await
        );

        post_as(
            &client,
            "creator",
            format!("/elections/{id}/candidates/0/review"),
            json!({ "decision": 1 }),
        )
        .await;
        assert_eq!(
            Status::Forbidden,
            open_window(&client, "alice", id, "voting", 10).await
        );
        assert_eq!(
            Status::Ok,
            open_window(&client, "creator", id, "voting", 10).await
        );
        assert_eq!(summary(&client, id).await.phase, Phase::Voting);
    }

    #[backend_test]
    async fn tally_waits_for_voting_to_close(client: Client, clock: ManualClock) {
        let id = create_election(&client, "creator", "voter-ids").await;
        open_window(&client, "creator", id, "review", 5).await;
        clock.advance_secs(5);
        open_window(&client, "creator", id, "voting", 5).await;

        let uri = format!("/elections/{id}/tally");
        let response = post_as(&client, "creator", uri.clone(), json!({})).await;
        assert_eq!(Status::Conflict, response.status());

        clock.advance_secs(5);
        let response = post_as(&client, "mallory", uri.clone(), json!({})).await;
        assert_eq!(Status::Forbidden, response.status());

        // Nobody applied, so there is no one to win.
        let response = post_as(&client, "creator", uri, json!({})).await;
        assert_eq!(Status::Conflict, response.status());
        assert_eq!(summary(&client, id).await.phase, Phase::Voting);
    }

    #[backend_test]
    async fn unknown_election_is_not_found(client: Client) {
        let status = open_window(&client, "creator", 404, "review", 60).await;
        assert_eq!(Status::NotFound, status);
    }
}
