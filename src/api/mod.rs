use rocket::Route;

mod creator;
mod public;
mod voter;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(creator::routes());
    routes.extend(public::routes());
    routes.extend(voter::routes());
    routes
}

/// Helpers for driving the API from tests as a particular identity.
#[cfg(test)]
pub(crate) mod testing {
    use rocket::{
        http::{ContentType, Cookie, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json::{json, Value},
    };

    use crate::model::{
        api::{auth::AuthToken, election::ElectionCreated},
        common::{election::ElectionId, identity::Identity},
    };
    use crate::Config;

    /// A signed auth cookie for `identity`.
    pub fn auth_cookie(client: &Client, identity: &str) -> Cookie<'static> {
        let config = client.rocket().state::<Config>().unwrap();
        AuthToken::new(Identity::from(identity))
            .into_cookie(config)
            .unwrap()
    }

    pub async fn post_as<'c>(
        client: &'c Client,
        identity: &str,
        uri: String,
        body: Value,
    ) -> LocalResponse<'c> {
        client
            .post(uri)
            .header(ContentType::JSON)
            .cookie(auth_cookie(client, identity))
            .body(body.to_string())
            .dispatch()
            .await
    }

    pub async fn get_as<'c>(client: &'c Client, identity: &str, uri: String) -> LocalResponse<'c> {
        client
            .get(uri)
            .cookie(auth_cookie(client, identity))
            .dispatch()
            .await
    }

    /// Create an election owned by `creator`, gated on `source`.
    pub async fn create_election(client: &Client, creator: &str, source: &str) -> ElectionId {
        let response = post_as(
            client,
            creator,
            "/elections".to_string(),
            json!({ "eligibility_source": source }),
        )
        .await;
        assert_eq!(Status::Ok, response.status());
        response.into_json::<ElectionCreated>().await.unwrap().id
    }

    /// Open a window of `duration` seconds: `window` is `review` or `voting`.
    pub async fn open_window(
        client: &Client,
        creator: &str,
        id: ElectionId,
        window: &str,
        duration: u32,
    ) -> Status {
        post_as(
            client,
            creator,
            format!("/elections/{id}/{window}"),
            json!({ "duration": duration }),
        )
        .await
        .status()
    }
}
