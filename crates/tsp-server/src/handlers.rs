use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use tsp_core::UserId;
use tsp_ledger::*;
use tsp_store::StoreError;

/// Maps a failure onto its status and `{"error": ...}` body.
fn failure(e: StoreError) -> HttpResponse {
    match e {
        StoreError::Rejected(ref r @ Rejection::NotFound(_)) => {
            HttpResponse::NotFound().json(ErrorBody::new(r))
        }
        StoreError::Rejected(ref r @ Rejection::Invalid(_)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(r))
        }
        StoreError::Rejected(ref r @ (Rejection::Capacity { .. } | Rejection::Duplicate(_))) => {
            HttpResponse::Conflict().json(ErrorBody::new(r))
        }
        StoreError::Collision(_) | StoreError::Backend(_) => {
            log::error!("request failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorBody::new("internal server error"))
        }
    }
}

fn game_id(path: &str) -> Result<GameId, StoreError> {
    GameId::try_from(path).map_err(StoreError::from)
}

pub async fn book(
    ledger: web::Data<Ledger>,
    config: web::Data<Config>,
    req: web::Json<BookRequest>,
) -> impl Responder {
    let order = match Order::try_from(req.into_inner()) {
        Ok(order) => order,
        Err(e) => return failure(e.into()),
    };
    match ledger.create_game(order).await {
        Ok(game) => HttpResponse::Created().json(BookResponse {
            message: "Booking confirmed".to_string(),
            join_link: config.join_link(game.token()),
            game_id: game.token().clone(),
            advance_paid: game.terms().advance(),
            share_per_player: game.share(),
        }),
        Err(e) => failure(e),
    }
}

pub async fn game(ledger: web::Data<Ledger>, path: web::Path<String>) -> impl Responder {
    let id = match game_id(&path) {
        Ok(id) => id,
        Err(e) => return failure(e),
    };
    match ledger.get_game(&id).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => failure(e),
    }
}

pub async fn pay(
    ledger: web::Data<Ledger>,
    path: web::Path<String>,
    req: web::Json<PayRequest>,
) -> impl Responder {
    let id = match game_id(&path) {
        Ok(id) => id,
        Err(e) => return failure(e),
    };
    let payer = match Payer::try_from(&*req) {
        Ok(payer) => payer,
        Err(e) => return failure(e.into()),
    };
    match ledger.record_payment(&id, payer).await {
        Ok((payment, view)) => HttpResponse::Created().json(PayResponse::new(&payment, &view)),
        Err(e) => failure(e),
    }
}

pub async fn games(ledger: web::Data<Ledger>, path: web::Path<UserId>) -> impl Responder {
    match ledger.list_games(path.into_inner()).await {
        Ok(games) => HttpResponse::Ok().json(games),
        Err(e) => failure(e),
    }
}

pub async fn watch(
    ledger: web::Data<Ledger>,
    path: web::Path<String>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let id = match game_id(&path) {
        Ok(id) => id,
        Err(e) => return failure(e),
    };
    let (watcher, view) = match ledger.watch(&id).await {
        Ok(subscription) => subscription,
        Err(e) => return failure(e),
    };
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match watcher.bridge(&view, session, stream).await {
            Ok(()) => response,
            Err(e) => HttpResponse::InternalServerError().json(ErrorBody::new(e)),
        },
        Err(e) => HttpResponse::BadRequest().json(ErrorBody::new(e)),
    }
}

pub async fn health(ledger: web::Data<Ledger>) -> impl Responder {
    match ledger.healthy().await {
        true => HttpResponse::Ok().body("ok"),
        false => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Malformed JSON bodies get the same error shape as everything else.
pub fn malformed(err: actix_web::error::JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    let body = ErrorBody::new(&err);
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::App;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use clap::Parser;
    use std::sync::Arc;
    use tsp_store::Roster;

    fn ledger(duplicates: Duplicates) -> web::Data<Ledger> {
        let roster = Roster::default()
            .with_organiser(Organiser::new(7, "Rahul".into(), "rahul".into()))
            .with_turf(Turf::new(3, "Green Arena".into(), "Pune".into(), Some("arena@upi".into())));
        web::Data::new(Ledger::memory(Arc::new(roster), Policy::new(duplicates)))
    }
    fn config() -> web::Data<Config> {
        web::Data::new(Config::try_parse_from(["backend", "--public-origin", "https://turf.app"]).unwrap())
    }
    fn booking(amount: u32, players: u32, kind: &str) -> serde_json::Value {
        serde_json::json!({
            "user_id": 7,
            "turf_id": 3,
            "date": "2026-10-18",
            "start_time": "09:00",
            "amount": amount,
            "num_players": players,
            "type": kind,
        })
    }
    fn payment(name: &str) -> serde_json::Value {
        serde_json::json!({ "player_name": name, "upi_ref": "UPI-77" })
    }

    macro_rules! app {
        ($ledger:expr) => {
            test::init_service(
                App::new()
                    .app_data($ledger)
                    .app_data(config())
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn booking_returns_join_link_and_shares() {
        let app = app!(ledger(Duplicates::Allow));
        let req = test::TestRequest::post().uri("/book").set_json(booking(1200, 4, "split")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let game_id = body["game_id"].as_str().unwrap();
        assert!(game_id.starts_with("rahul-09AM-"));
        assert_eq!(body["join_link"], format!("https://turf.app/join/{}", game_id));
        assert_eq!(body["advance_paid"], 240.0);
        assert_eq!(body["share_per_player"], 300.0);
        assert_eq!(body["message"], "Booking confirmed");
    }

    #[actix_web::test]
    async fn friends_pay_until_settled() {
        let app = app!(ledger(Duplicates::Allow));
        let req = test::TestRequest::post().uri("/book").set_json(booking(1200, 4, "offline")).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let game_id = body["game_id"].as_str().unwrap().to_string();
        let pay = format!("/game/{}/pay", game_id);
        for name in ["A", "B", "C"] {
            let req = test::TestRequest::post().uri(&pay).set_json(payment(name)).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }
        let req = test::TestRequest::get().uri(&format!("/game/{}", game_id)).to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["slots_filled"], 3);
        assert_eq!(view["amount_collected"], 900.0);
        assert_eq!(view["remaining"], 300.0);
        assert_eq!(view["status"], "partial");
        assert_eq!(view["owner_upi"], "arena@upi");
        assert_eq!(view["payments"].as_array().unwrap().len(), 3);
        let req = test::TestRequest::post().uri(&pay).set_json(payment("D")).to_request();
        let paid: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(paid["share_paid"], 300.0);
        assert_eq!(paid["slots_filled"], 4);
        assert_eq!(paid["amount_collected"], 1200.0);
        assert_eq!(paid["remaining"], 0.0);
        assert_eq!(paid["status"], "settled");
        assert_eq!(paid["message"], "Payment of ₹300.00 recorded for D");
        let req = test::TestRequest::post().uri(&pay).set_json(payment("E")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn unknown_games_are_not_found() {
        let app = app!(ledger(Duplicates::Allow));
        for req in [
            test::TestRequest::get().uri("/game/nobody-09AM").to_request(),
            test::TestRequest::post().uri("/game/nobody-09AM/pay").set_json(payment("A")).to_request(),
            test::TestRequest::get().uri("/game/nobody-09AM/watch").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Game not found");
        }
    }

    #[actix_web::test]
    async fn invalid_requests_are_bad() {
        let app = app!(ledger(Duplicates::Allow));
        let req = test::TestRequest::post().uri("/book").set_json(booking(1200, 0, "split")).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        let req = test::TestRequest::post().uri("/book").set_json(booking(800, 2, "online")).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let pay = format!("/game/{}/pay", body["game_id"].as_str().unwrap());
        let req = test::TestRequest::post()
            .uri(&pay)
            .set_json(serde_json::json!({ "player_name": "Asha" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "UPI Transaction ID is required to confirm payment");
        let req = test::TestRequest::post()
            .uri(&pay)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn duplicate_names_conflict_when_rejected() {
        let app = app!(ledger(Duplicates::Reject));
        let req = test::TestRequest::post().uri("/book").set_json(booking(1200, 4, "split")).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let pay = format!("/game/{}/pay", body["game_id"].as_str().unwrap());
        let req = test::TestRequest::post().uri(&pay).set_json(payment("Asha")).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        let req = test::TestRequest::post().uri(&pay).set_json(payment("asha")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "asha has already paid their share");
    }

    #[actix_web::test]
    async fn organiser_lists_games() {
        let app = app!(ledger(Duplicates::Allow));
        for players in [2, 4] {
            let req = test::TestRequest::post().uri("/book").set_json(booking(800, players, "split")).to_request();
            test::call_service(&app, req).await;
        }
        let req = test::TestRequest::get().uri("/users/7/games").to_request();
        let games: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let games = games.as_array().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0]["turf_name"], "Green Arena");
        assert_eq!(games[0]["status"], "partial");
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = app!(ledger(Duplicates::Allow));
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
