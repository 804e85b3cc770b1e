//! Named route and URL generation tests

use viaduct_router::{Flow, Params, Router, RouterError};
use viaduct_test_utils::{TestRequest, TestResponse};

type TestRouter = Router<TestRequest, TestResponse>;

fn done(_: &mut TestRequest, res: &mut TestResponse, _: &mut Flow) {
    res.end("ok");
}

fn values<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    pairs.into_iter().collect()
}

#[test]
fn test_generate_literal_route() {
    let mut router = TestRouter::default();
    router.get("/about/team", done).unwrap().name("team").unwrap();

    assert_eq!(router.generate("team", &Params::new()).unwrap(), "/about/team");
}

#[test]
fn test_generate_with_params() {
    let mut router = TestRouter::default();
    router
        .get("/user/:id/posts/:slug", done)
        .unwrap()
        .name("user-post")
        .unwrap();

    let url = router
        .generate("user-post", &values([("id", "7"), ("slug", "hello")]))
        .unwrap();
    assert_eq!(url, "/user/7/posts/hello");
}

#[test]
fn test_generate_optional_absent() {
    let mut router = TestRouter::default();
    router
        .get("/archive/:year/:month?", done)
        .unwrap()
        .name("archive")
        .unwrap();

    assert_eq!(
        router.generate("archive", &values([("year", "2024")])).unwrap(),
        "/archive/2024"
    );
}

#[test]
fn test_generate_unknown_name() {
    let router = TestRouter::default();
    assert!(matches!(
        router.generate("nope", &Params::new()),
        Err(RouterError::UnknownRoute(_))
    ));
}

#[test]
fn test_generate_missing_param_is_an_error() {
    let mut router = TestRouter::default();
    router.get("/user/:id", done).unwrap().name("user").unwrap();

    assert!(matches!(
        router.generate("user", &Params::new()),
        Err(RouterError::Pattern(_))
    ));
}

#[test]
fn test_names_survive_merges_with_prefixed_paths() {
    let mut sub = TestRouter::default();
    sub.get("/posts/:id", done).unwrap().name("post").unwrap();

    let mut router = TestRouter::default();
    router.merge_at("/blog", sub).unwrap();

    let url = router.generate("post", &values([("id", "3")])).unwrap();
    assert_eq!(url, "/blog/posts/3");
}

#[test]
fn test_name_after_merge_has_no_target() {
    let mut sub = TestRouter::default();
    sub.get("/a", done).unwrap();

    let mut router = TestRouter::default();
    router.merge_at("/m", sub).unwrap();
    assert!(matches!(router.name("late"), Err(RouterError::NothingToName)));
}
