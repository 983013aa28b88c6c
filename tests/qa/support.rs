//! Shared setup: a fully registered service and a few request helpers.

use std::collections::HashMap;

use blogqa::api::handlers;
use blogqa::config::BootstrapAdmin;
use blogqa::{ApiResponse, App, Authenticator, Config, HandlerError, InMemoryModelStore, Service, Session};
use serde_json::{json, Value};

pub type TestService = Service<App<InMemoryModelStore>>;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "password123";

pub fn service() -> TestService {
    let config = Config {
        bootstrap_admin: Some(BootstrapAdmin {
            name: "Admin".into(),
            email: ADMIN_EMAIL.into(),
            password: PASSWORD.into(),
        }),
        ..Config::default()
    };
    let app = App::in_memory(config);
    app.bootstrap().unwrap();
    handlers::service(app)
}

pub fn id_param(id: &str) -> HashMap<String, String> {
    HashMap::from([("id".to_string(), id.to_string())])
}

pub fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn data(response: &ApiResponse) -> &Value {
    response.data.as_ref().expect("response carries data")
}

fn session_for(service: &TestService, auth: &ApiResponse) -> Session {
    let token = data(auth)["accessToken"].as_str().unwrap();
    service.app().authenticate(token).unwrap()
}

/// Register a user and return their session.
pub fn register(service: &TestService, name: &str) -> Session {
    let response = service
        .dispatch(
            "auth.register",
            json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "password": PASSWORD,
            }),
            Session::new(),
        )
        .unwrap();
    assert_eq!(response.status, 201);
    session_for(service, &response)
}

pub fn admin(service: &TestService) -> Session {
    let response = service
        .dispatch(
            "auth.login",
            json!({ "email": ADMIN_EMAIL, "password": PASSWORD }),
            Session::new(),
        )
        .unwrap();
    session_for(service, &response)
}

pub fn ask(service: &TestService, session: &Session, title: &str) -> String {
    let response = service
        .dispatch(
            "question.create",
            json!({
                "title": title,
                "content": "Some details about the problem at hand.",
                "tags": ["rust"],
            }),
            session.clone(),
        )
        .unwrap();
    data(&response)["id"].as_str().unwrap().to_string()
}

pub fn answer(service: &TestService, session: &Session, question_id: &str) -> String {
    let response = service
        .dispatch_with(
            "answer.create",
            id_param(question_id),
            json!({ "content": "Have you tried turning it off and on?" }),
            session.clone(),
        )
        .unwrap();
    data(&response)["id"].as_str().unwrap().to_string()
}

pub fn vote(
    service: &TestService,
    session: &Session,
    command: &str,
    target_id: &str,
    vote_type: &str,
) -> Result<ApiResponse, HandlerError> {
    service.dispatch_with(
        command,
        id_param(target_id),
        json!({ "voteType": vote_type }),
        session.clone(),
    )
}
