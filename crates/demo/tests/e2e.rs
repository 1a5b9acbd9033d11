use std::sync::Arc;
use std::thread;
use trellis_core::Component;
use trellis_core::prelude::*;
use trellis_demo::controller::HelloController;
use trellis_demo::{ROOT, catalog};

fn dispatcher() -> Dispatcher {
    Dispatcher::new(initialize(&catalog(), ROOT).unwrap())
}

fn get(dispatcher: &Dispatcher, request: &RequestView) -> (Outcome, String) {
    let mut body = String::new();
    let outcome = dispatcher.dispatch(request, &mut body);
    (outcome, body)
}

#[test]
fn greets_by_name() {
    let dispatcher = dispatcher();
    let (outcome, body) = get(&dispatcher, &RequestView::from_target("/hello/world?name=Sam"));
    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(body, "Hello,Sam");
}

#[test]
fn repeated_names_are_joined() {
    let dispatcher = dispatcher();
    let (_, body) = get(&dispatcher, &RequestView::from_target("/hello/world?name=a&name=b"));
    assert_eq!(body, "Hello,a, b");
}

#[test]
fn missing_name_greets_nobody() {
    let dispatcher = dispatcher();
    assert_eq!(get(&dispatcher, &RequestView::from_target("/hello/world")).1, "Hello,");
}

#[test]
fn age_comes_from_injected_service() {
    let dispatcher = dispatcher();
    assert_eq!(get(&dispatcher, &RequestView::from_target("/hello/age")), (Outcome::Handled, "Age is 42".to_owned()));
}

#[test]
fn index_page() {
    let dispatcher = dispatcher();
    assert_eq!(get(&dispatcher, &RequestView::from_target("/")).1, "hello world");
}

#[test]
fn unknown_path_is_not_found() {
    let dispatcher = dispatcher();
    let (outcome, body) = get(&dispatcher, &RequestView::from_target("/does/not/exist"));
    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(body, "404 Not Found");
}

#[test]
fn context_path_is_stripped() {
    let dispatcher = dispatcher();
    let request = RequestView::from_target("/demo/hello/age").with_context_path("/demo");
    assert_eq!(get(&dispatcher, &request).1, "Age is 42");
}

#[test]
fn dotted_root_is_accepted() {
    let application = initialize(&catalog(), "trellis_demo.controller").unwrap();
    let mut keys: Vec<_> = application.registry().keys().collect();
    keys.sort_unstable();
    assert_eq!(keys, ["helloController", "indexController"]);
}

#[test]
fn unwired_service_fails_the_request() {
    let dispatcher = Dispatcher::new(initialize(&catalog(), "trellis_demo::controller").unwrap());
    let (outcome, body) = get(&dispatcher, &RequestView::from_target("/hello/age"));
    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(body, "500 Server Internal Error");
}

#[test]
fn routes_are_stable_across_initializations() {
    let sources = || {
        let application = initialize(&catalog(), ROOT).unwrap();
        let mut sources: Vec<_> = application.routes().iter().map(|route| route.source().to_owned()).collect();
        sources.sort_unstable();
        sources
    };
    assert_eq!(sources(), ["/", "/hello/age", "/hello/world"]);
    assert_eq!(sources(), sources());
}

#[test]
fn hello_controller_descriptor() {
    let descriptor = HelloController::descriptor();
    assert_eq!(descriptor.key(), "helloController");
    assert_eq!(descriptor.base_path, Some("/hello"));
    assert_eq!(descriptor.injections[0].field, "hello_service");
}

#[test]
fn concurrent_dispatch_shares_one_dispatcher() {
    let dispatcher = Arc::new(dispatcher());

    thread::scope(|scope| {
        for worker in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            scope.spawn(move || {
                for round in 0..50 {
                    let name = format!("w{worker}r{round}");
                    let request = RequestView::from_target(&format!("/hello/world?name={name}"));
                    assert_eq!(get(&dispatcher, &request), (Outcome::Handled, format!("Hello,{name}")));
                    assert_eq!(get(&dispatcher, &RequestView::from_target("/hello/age")).1, "Age is 42");
                }
            });
        }
    });
}
