//! HTTP route table: method + path template → command name.
//!
//! Path parameters (`:id`) and query-string values reach handlers through
//! [`Context::param`](super::Context::param).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub command: &'static str,
}

const fn route(method: &'static str, path: &'static str, command: &'static str) -> Route {
    Route {
        method,
        path,
        command,
    }
}

pub const ROUTES: &[Route] = &[
    route("GET", "/health", "health"),
    route("POST", "/auth/register", "auth.register"),
    route("POST", "/auth/login", "auth.login"),
    route("GET", "/auth/me", "auth.me"),
    route("GET", "/users", "user.list"),
    route("GET", "/users/:id", "user.get"),
    route("PUT", "/users/:id", "user.update"),
    route("DELETE", "/users/:id", "user.delete"),
    route("GET", "/categories", "category.list"),
    route("POST", "/categories", "category.create"),
    route("PUT", "/categories/:id", "category.update"),
    route("DELETE", "/categories/:id", "category.delete"),
    route("GET", "/tags", "tag.list"),
    route("POST", "/tags", "tag.create"),
    route("GET", "/posts", "post.list"),
    route("POST", "/posts", "post.create"),
    route("GET", "/posts/:id", "post.get"),
    route("PUT", "/posts/:id", "post.update"),
    route("DELETE", "/posts/:id", "post.delete"),
    route("GET", "/posts/:id/comments", "comment.list"),
    route("POST", "/posts/:id/comments", "comment.create"),
    route("DELETE", "/comments/:id", "comment.delete"),
    route("GET", "/qa/questions", "question.list"),
    route("POST", "/qa/questions", "question.create"),
    route("GET", "/qa/questions/:id", "question.get"),
    route("PUT", "/qa/questions/:id", "question.update"),
    route("DELETE", "/qa/questions/:id", "question.delete"),
    route("POST", "/qa/questions/:id/vote", "question.vote"),
    route("GET", "/qa/questions/:id/vote-status", "question.vote_status"),
    route("GET", "/qa/questions/:id/answers", "answer.list"),
    route("POST", "/qa/questions/:id/answers", "answer.create"),
    route("PUT", "/qa/answers/:id", "answer.update"),
    route("DELETE", "/qa/answers/:id", "answer.delete"),
    route("POST", "/qa/answers/:id/vote", "answer.vote"),
    route("GET", "/qa/answers/:id/vote-status", "answer.vote_status"),
    route("POST", "/qa/answers/:id/accept", "answer.accept"),
    route("GET", "/admin/stats", "admin.stats"),
    route("GET", "/admin/activity", "admin.activity"),
    route("POST", "/admin/reconcile-votes", "admin.reconcile_votes"),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::api::handlers;
    use crate::app::App;
    use crate::config::Config;

    #[test]
    fn every_route_has_a_handler() {
        let service = handlers::service(App::in_memory(Config::default()));
        let registered: HashSet<&str> = service.commands().into_iter().collect();
        for route in ROUTES {
            assert!(registered.contains(route.command), "no handler for {}", route.command);
        }
        let routed: HashSet<&str> = ROUTES.iter().map(|r| r.command).collect();
        assert_eq!(routed.len(), registered.len());
    }

    #[test]
    fn method_and_path_pairs_are_unique() {
        let pairs: HashSet<(&str, &str)> = ROUTES.iter().map(|r| (r.method, r.path)).collect();
        assert_eq!(pairs.len(), ROUTES.len());
    }
}
