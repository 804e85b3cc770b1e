//! Route table matching and verb helper tests

use viaduct_router::{Flow, RequestHead, Router, RouterConfig};
use viaduct_test_utils::{TestRequest, TestResponse};

type TestRouter = Router<TestRequest, TestResponse>;

fn run(router: &TestRouter, method: &str, path: &str) -> TestResponse {
    let mut req = TestRequest::new();
    let mut res = TestResponse::new();
    router
        .dispatch(RequestHead::new(method, path), &mut req, &mut res)
        .unwrap();
    res
}

fn reply(body: &'static str) -> impl Fn(&mut TestRequest, &mut TestResponse, &mut Flow) {
    move |_req, res, _flow| res.end(body)
}

#[test]
fn test_get_matches_only_get() {
    let mut router = TestRouter::default();
    router.get("/hello", reply("GET")).unwrap();

    assert_eq!(run(&router, "GET", "/hello").body(), "GET");
    assert_eq!(run(&router, "POST", "/hello").status(), Some(404));
}

#[test]
fn test_verb_helpers() {
    let mut router = TestRouter::default();
    router.post("/r", reply("POST")).unwrap();
    router.put("/r", reply("PUT")).unwrap();
    router.patch("/r", reply("PATCH")).unwrap();
    router.delete("/r", reply("DELETE")).unwrap();
    router.head("/r", reply("HEAD")).unwrap();
    router.options("/r", reply("OPTIONS")).unwrap();

    for method in ["POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"] {
        assert_eq!(run(&router, method, "/r").body(), method);
    }
}

#[test]
fn test_add_takes_any_verb() {
    let mut router = TestRouter::default();
    router.add("purge", "/cache", reply("purged")).unwrap();

    assert_eq!(run(&router, "PURGE", "/cache").body(), "purged");
    assert_eq!(run(&router, "GET", "/cache").status(), Some(404));
}

#[test]
fn test_any_matches_listed_methods() {
    let mut router = TestRouter::default();
    router
        .any(&["GET", "POST"], "/form", reply("form"))
        .unwrap();

    assert_eq!(run(&router, "GET", "/form").body(), "form");
    assert_eq!(run(&router, "POST", "/form").body(), "form");
    assert_eq!(run(&router, "DELETE", "/form").status(), Some(404));
}

#[test]
fn test_all_matches_every_method() {
    let mut router = TestRouter::default();
    router.all("/every", reply("every")).unwrap();

    for method in ["GET", "POST", "DELETE", "MKCOL"] {
        assert_eq!(run(&router, method, "/every").body(), "every");
    }
}

#[test]
fn test_root_route() {
    let mut router = TestRouter::default();
    router.get("/", reply("root")).unwrap();

    assert_eq!(run(&router, "GET", "/").body(), "root");
    assert_eq!(run(&router, "GET", "/other").status(), Some(404));
}

#[test]
fn test_first_registered_route_wins() {
    let mut router = TestRouter::default();
    router.get("/dup", reply("first")).unwrap();
    router.get("/dup", reply("second")).unwrap();

    assert_eq!(run(&router, "GET", "/dup").body(), "first");
}

#[test]
fn test_trailing_slash_is_tolerated() {
    let mut router = TestRouter::default();
    router.get("/about", reply("about")).unwrap();

    assert_eq!(run(&router, "GET", "/about").body(), "about");
    assert_eq!(run(&router, "GET", "/about/").body(), "about");
}

#[test]
fn test_paths_are_case_insensitive_by_default() {
    let mut router = TestRouter::default();
    router.get("/About", reply("about")).unwrap();

    assert_eq!(run(&router, "GET", "/about").body(), "about");
    assert_eq!(run(&router, "GET", "/ABOUT").body(), "about");
}

#[test]
fn test_case_sensitive_config() {
    let mut router = TestRouter::new(RouterConfig {
        case_sensitive: true,
        host: None,
    });
    router.get("/About", reply("about")).unwrap();

    assert_eq!(run(&router, "GET", "/About").body(), "about");
    assert_eq!(run(&router, "GET", "/about").status(), Some(404));
}

#[test]
fn test_not_found_fallback_body() {
    let router = TestRouter::default();
    let res = run(&router, "GET", "/nowhere");
    assert_eq!(res.status(), Some(404));
    assert_eq!(res.body(), "Cannot GET /nowhere");
}

#[test]
fn test_bad_template_rejected_at_registration() {
    let mut router = TestRouter::default();
    assert!(router.get("/(abc", reply("never")).is_err());
    // The failed call installed nothing
    assert!(router.routes().is_empty());
}
