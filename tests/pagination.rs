//! Paginator behaviour against `Link`-header pagination.

use ghvars::{GitHubClient, List, PaginationMode, Paginator, Variable, VariableList, VariableScope};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIST_PATH: &str = "/repos/octocat/hello-world/actions/variables";

/// Mount `count` single-variable pages chained by `next` links.
async fn mount_pages(mock_server: &MockServer, count: usize) {
    for page in 1..=count {
        let mut response = ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_count": count,
            "variables": [{ "name": format!("VAR_{page}"), "value": page.to_string() }]
        }));
        if page < count {
            response = response.insert_header(
                "link",
                format!(
                    "<{}{LIST_PATH}?per_page=1&page={}>; rel=\"next\"",
                    mock_server.uri(),
                    page + 1
                )
                .as_str(),
            );
        }

        let mock = Mock::given(method("GET")).and(path(LIST_PATH));
        let mock = if page == 1 {
            mock.and(query_param_is_missing("page"))
        } else {
            mock.and(query_param("page", page.to_string().as_str()))
        };
        mock.respond_with(response).expect(1).mount(mock_server).await;
    }
}

#[tokio::test]
async fn test_paginator_steps_one_page_per_call() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server, 3).await;

    let client = GitHubClient::new("test-token", &mock_server.uri())
        .unwrap()
        .with_per_page(1);
    let scope = VariableScope::repository(("octocat", "hello-world"));
    let mut pages = Variable::pages(&client, &scope);

    let mut names = Vec::new();
    while let Some(page) = pages.next_page().await.unwrap() {
        assert_eq!(page.total_count, 3);
        names.extend(page.variables.into_iter().map(|v| v.name));
        assert_eq!(
            mock_server.received_requests().await.unwrap().len(),
            names.len()
        );
    }

    assert_eq!(names, ["VAR_1", "VAR_2", "VAR_3"]);
    assert_eq!(pages.pages_fetched(), 3);
    assert!(!pages.has_next());
    assert!(pages.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_paginator_exposes_next_cursor() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server, 2).await;

    let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
    let mut pages: Paginator<'_, VariableList> =
        client.paginator(LIST_PATH.trim_start_matches('/'));

    pages.next_page().await.unwrap();
    let cursor = pages.next_cursor().unwrap();
    assert_eq!(cursor.query(), Some("per_page=1&page=2"));
    assert_eq!(client.last_response().unwrap().next.as_ref(), Some(cursor));
}

#[tokio::test]
async fn test_paginate_with_custom_fold() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server, 3).await;

    let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
    let mut folds = 0;
    let list: VariableList = client
        .paginate_with(
            LIST_PATH.trim_start_matches('/'),
            PaginationMode::All,
            |acc: &mut VariableList, page: VariableList| {
                folds += 1;
                acc.variables.extend(page.variables.into_iter().rev());
            },
        )
        .await
        .unwrap();

    // The fold runs once per page after the first
    assert_eq!(folds, 2);
    assert_eq!(list.len(), 3);
    assert_eq!(list.total_count, 3);
}

#[tokio::test]
async fn test_first_page_mode_fetches_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!("<{}{LIST_PATH}?page=2>; rel=\"next\"", mock_server.uri()).as_str(),
                )
                .set_body_json(serde_json::json!({
                    "total_count": 5,
                    "variables": [{ "name": "A", "value": "1" }]
                })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
    let list: VariableList = client
        .paginate_mode(LIST_PATH.trim_start_matches('/'), PaginationMode::FirstPage)
        .await
        .unwrap();

    assert_eq!(list.total_count, 5);
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_error_on_later_page_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!("<{}{LIST_PATH}?page=2>; rel=\"next\"", mock_server.uri()).as_str(),
                )
                .set_body_json(serde_json::json!({
                    "total_count": 2,
                    "variables": [{ "name": "A", "value": "1" }]
                })),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Variable::list_all(&client, &VariableScope::repository(("octocat", "hello-world")))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_restart_fetches_first_page_again() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_count": 1,
            "variables": [{ "name": "ONLY", "value": "1" }]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
    let mut pages: Paginator<'_, VariableList> =
        client.paginator(LIST_PATH.trim_start_matches('/'));

    assert!(pages.next_page().await.unwrap().is_some());
    assert!(pages.next_page().await.unwrap().is_none());

    pages.restart();
    assert_eq!(pages.pages_fetched(), 0);

    let page = pages.next_page().await.unwrap().unwrap();
    assert_eq!(page.variables[0].name, "ONLY");
    assert_eq!(pages.pages_fetched(), 1);
}

#[tokio::test]
async fn test_self_referencing_cursor_stops_at_page_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!("<{}{LIST_PATH}?page=2>; rel=\"next\"", mock_server.uri()).as_str(),
                )
                .set_body_json(serde_json::json!({
                    "total_count": 1,
                    "variables": [{ "name": "LOOP", "value": "1" }]
                })),
        )
        .expect(1000)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new("test-token", &mock_server.uri()).unwrap();
    let list = Variable::list_all(&client, &VariableScope::repository(("octocat", "hello-world")))
        .await
        .unwrap();

    assert_eq!(list.len(), 1000);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1000);
}
