//! API integration tests
//!
//! These run against a live server seeded with:
//!   catalog-server create-user reader reader
//!   catalog-server create-user librarian librarian --librarian --editor

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get a token for one of the seeded accounts
async fn get_auth_token(client: &Client, username: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": username
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "reader",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_home_counts_and_visits() {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let mut last = 0;
    for expected in 1..=3 {
        let response = client
            .get(BASE_URL)
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let body: Value = response.json().await.expect("Failed to parse response");
        let books = body["num_books"].as_i64().unwrap();
        let fiction = body["num_fiction"].as_i64().unwrap();
        let nonfiction = body["num_nonfiction"].as_i64().unwrap();
        assert_eq!(fiction + nonfiction, books);

        last = body["num_visits"].as_i64().unwrap();
        assert_eq!(last, expected);
    }
    assert_eq!(last, 3);
}

#[tokio::test]
#[ignore]
async fn test_new_client_gets_new_session() {
    let body: Value = Client::new()
        .get(BASE_URL)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["num_visits"], 1);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?per_page=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert_eq!(body["per_page"], 5);
}

#[tokio::test]
#[ignore]
async fn test_missing_book_is_404() {
    let response = Client::new()
        .get(format!("{}/books/999999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_my_books_only_on_loan() {
    let client = Client::new();
    let token = get_auth_token(&client, "reader").await;

    let response = client
        .get(format!("{}/mybooks", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let loans = body.as_array().expect("array of copies");
    for copy in loans {
        assert_eq!(copy["status"], "on_loan");
        assert_eq!(copy["borrower_id"], me["user_id"]);
        assert!(copy["overdue"].is_boolean());
    }
    let dates: Vec<&str> = loans.iter().filter_map(|c| c["due_back"].as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[tokio::test]
#[ignore]
async fn test_all_borrowed_requires_permission() {
    let client = Client::new();

    let reader = get_auth_token(&client, "reader").await;
    let response = client
        .get(format!("{}/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let librarian = get_auth_token(&client, "librarian").await;
    let response = client
        .get(format!("{}/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_renew_rejects_past_date() {
    let client = Client::new();
    let token = get_auth_token(&client, "librarian").await;

    let borrowed: Value = client
        .get(format!("{}/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let Some(copy) = borrowed.as_array().and_then(|a| a.first()) else {
        return;
    };
    let id = copy["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": "2000-01-01" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "PastDate");
}

#[tokio::test]
#[ignore]
async fn test_author_create_and_delete() {
    let client = Client::new();
    let token = get_auth_token(&client, "librarian").await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Test",
            "last_name": "Author",
            "date_of_birth": "1950-05-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let author_id = body["id"].as_i64().expect("No author ID");

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let response = Client::new()
        .get(format!("{}/mybooks", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
