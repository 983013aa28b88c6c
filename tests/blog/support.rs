use std::collections::HashMap;

use blogqa::api::handlers;
use blogqa::config::BootstrapAdmin;
use blogqa::{ApiResponse, App, Authenticator, Config, InMemoryModelStore, Service, Session};
use serde_json::{json, Value};

pub type TestService = Service<App<InMemoryModelStore>>;

pub fn service() -> TestService {
    let config = Config {
        bootstrap_admin: Some(BootstrapAdmin {
            name: "Admin".into(),
            email: "admin@example.com".into(),
            password: "password123".into(),
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

fn authenticate(service: &TestService, response: ApiResponse) -> Session {
    let token = data(&response)["accessToken"].as_str().unwrap();
    service.app().authenticate(token).unwrap()
}

pub fn register(service: &TestService, name: &str) -> Session {
    let response = service
        .dispatch(
            "auth.register",
            json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "password": "password123",
            }),
            Session::new(),
        )
        .unwrap();
    authenticate(service, response)
}

pub fn admin(service: &TestService) -> Session {
    let response = service
        .dispatch(
            "auth.login",
            json!({ "email": "admin@example.com", "password": "password123" }),
            Session::new(),
        )
        .unwrap();
    authenticate(service, response)
}

pub fn publish(service: &TestService, session: &Session, input: Value) -> Value {
    let response = service.dispatch("post.create", input, session.clone()).unwrap();
    assert_eq!(response.status, 201);
    data(&response).clone()
}
