//! Middleware, mounting, and table flattening tests

use viaduct_router::{Flow, RequestHead, Router};
use viaduct_test_utils::{CallLog, TestRequest, TestResponse};

type TestRouter = Router<TestRequest, TestResponse>;

fn run(router: &TestRouter, path: &str) -> TestResponse {
    let mut req = TestRequest::new();
    let mut res = TestResponse::new();
    router
        .dispatch(RequestHead::new("GET", path), &mut req, &mut res)
        .unwrap();
    res
}

fn log_and_next(
    log: &CallLog,
    entry: &'static str,
) -> impl Fn(&mut TestRequest, &mut TestResponse, &mut Flow) {
    let log = log.clone();
    move |_req, _res, flow| {
        log.push(entry);
        flow.next();
    }
}

fn log_and_end(
    log: &CallLog,
    entry: &'static str,
) -> impl Fn(&mut TestRequest, &mut TestResponse, &mut Flow) {
    let log = log.clone();
    move |_req, res, _flow| {
        log.push(entry);
        res.end(entry);
    }
}

#[test]
fn test_middleware_runs_before_route() {
    let log = CallLog::new();
    let mut router = TestRouter::default();
    router.middleware(log_and_next(&log, "mw")).unwrap();
    router.get("/page", log_and_end(&log, "route")).unwrap();

    let res = run(&router, "/page");
    assert_eq!(res.body(), "route");
    assert_eq!(log.joined(), "mw,route");
}

#[test]
fn test_middleware_order_is_registration_order() {
    let log = CallLog::new();
    let mut router = TestRouter::default();
    router.middleware(log_and_next(&log, "a")).unwrap();
    router.middleware(log_and_next(&log, "b")).unwrap();
    router.get("/x", log_and_end(&log, "c")).unwrap();

    run(&router, "/x");
    assert_eq!(log.joined(), "a,b,c");
}

#[test]
fn test_mounted_middleware_is_prefix_scoped() {
    let log = CallLog::new();
    let mut router = TestRouter::default();
    router.mount("/admin", log_and_next(&log, "guard")).unwrap();
    router.get("/admin/users", log_and_end(&log, "users")).unwrap();
    router.get("/public", log_and_end(&log, "public")).unwrap();

    run(&router, "/admin/users");
    assert_eq!(log.joined(), "guard,users");

    let log2 = CallLog::new();
    let mut router = TestRouter::default();
    router.mount("/admin", log_and_next(&log2, "guard")).unwrap();
    router.get("/public", log_and_end(&log2, "public")).unwrap();
    run(&router, "/public");
    assert_eq!(log2.joined(), "public");
}

#[test]
fn test_skip_abandons_the_chain() {
    let log = CallLog::new();
    let mut router = TestRouter::default();
    {
        let log = log.clone();
        router
            .get(
                "/jump",
                vec![
                    viaduct_router::Handler::new({
                        let log = log.clone();
                        move |_: &mut TestRequest, _: &mut TestResponse, flow: &mut Flow| {
                            log.push("first");
                            flow.skip();
                        }
                    }),
                    viaduct_router::Handler::new({
                        let log = log.clone();
                        move |_: &mut TestRequest, _: &mut TestResponse, _: &mut Flow| {
                            log.push("never");
                        }
                    }),
                ],
            )
            .unwrap();
    }
    router.get("/jump", log_and_end(&log, "second-route")).unwrap();

    let res = run(&router, "/jump");
    assert_eq!(res.body(), "second-route");
    assert_eq!(log.joined(), "first,second-route");
}

#[test]
fn test_group_flattens_under_prefix() {
    let log = CallLog::new();
    let mut router = TestRouter::default();
    router
        .group("/api", |api| {
            api.middleware(log_and_next(&log, "api-mw")).unwrap();
            api.get("/users", log_and_end(&log, "users")).unwrap();
        })
        .unwrap();

    let res = run(&router, "/api/users");
    assert_eq!(res.body(), "users");
    assert_eq!(log.joined(), "api-mw,users");

    // The group prefix scopes its middleware too
    assert_eq!(run(&router, "/users").status(), Some(404));
    assert_eq!(log.joined(), "api-mw,users");
}

#[test]
fn test_nested_groups() {
    let mut router = TestRouter::default();
    router
        .group("/api", |api| {
            api.group("/v1", |v1| {
                v1.get("/status", |_: &mut TestRequest, res: &mut TestResponse, _: &mut Flow| {
                    res.end("v1-status");
                })
                .unwrap();
            })
            .unwrap();
        })
        .unwrap();

    assert_eq!(run(&router, "/api/v1/status").body(), "v1-status");
    assert_eq!(run(&router, "/v1/status").status(), Some(404));
}

#[test]
fn test_merge_routes_keeps_paths() {
    let mut sub = TestRouter::default();
    sub.get("/widgets", |_: &mut TestRequest, res: &mut TestResponse, _: &mut Flow| {
        res.end("widgets");
    })
    .unwrap();

    let mut router = TestRouter::default();
    router.merge_routes(sub).unwrap();

    assert_eq!(run(&router, "/widgets").body(), "widgets");
}

#[test]
fn test_merge_at_prefixes_paths() {
    let mut sub = TestRouter::default();
    sub.get("/posts/:id", |req: &mut TestRequest, res: &mut TestResponse, _: &mut Flow| {
        let id = req.params.get("id").unwrap_or("?").to_string();
        res.end(&id);
    })
    .unwrap();

    let mut router = TestRouter::default();
    router.merge_at("/blog", sub).unwrap();

    assert_eq!(run(&router, "/blog/posts/9").body(), "9");
    assert_eq!(run(&router, "/posts/9").status(), Some(404));
    assert_eq!(router.routes()[0].path(), Some("/blog/posts/:id"));
}

#[test]
fn test_domain_group_combination() {
    let mut router = TestRouter::default();
    router
        .domain(":tenant.example.com", |d| {
            d.group("/api", |api| {
                api.get("/me", |req: &mut TestRequest, res: &mut TestResponse, _: &mut Flow| {
                    let tenant = req.subdomains.get("tenant").unwrap_or("?").to_string();
                    res.end(&tenant);
                })
                .unwrap();
            })
            .unwrap();
        })
        .unwrap();

    let mut req = TestRequest::new();
    let mut res = TestResponse::new();
    let head = RequestHead::new("GET", "/api/me").with_host("acme.example.com");
    router.dispatch(head, &mut req, &mut res).unwrap();
    assert_eq!(res.body(), "acme");
}
