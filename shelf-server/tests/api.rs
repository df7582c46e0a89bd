mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

use shelf_config::models::sources::EnvConfig;
use shelf_core::api_types::routes::{self, utils::with_id};

use common::{create_book, create_library, create_member, id_of, test_server};

#[tokio::test]
async fn ping_and_health_report_ok() -> Result<()> {
    let server = test_server()?;

    let ping = server.get(routes::PING).await;
    ping.assert_status_ok();
    assert_eq!(ping.json::<Value>()["status"], "ok");

    let health = server.get(routes::HEALTH).await;
    health.assert_status_ok();
    let body = health.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["backend"], "memory");
    Ok(())
}

#[tokio::test]
async fn library_crud_round_trip() -> Result<()> {
    let server = test_server()?;
    let id = create_library(&server).await;
    let item = with_id(routes::libraries::ITEM, id);

    let fetched = server.get(&item).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["name"], "Central");

    let patched = server.patch(&item).json(&json!({ "name": "Eastside" })).await;
    patched.assert_status_ok();
    let body = patched.json::<Value>();
    assert_eq!(body["name"], "Eastside");
    assert_eq!(body["address"], "1 Main St");

    let replaced = server
        .put(&item)
        .json(&json!({
            "name": "Westside",
            "address": "9 West Rd",
            "phone": "555-0199",
            "email": "west@library.test",
        }))
        .await;
    replaced.assert_status_ok();
    assert_eq!(replaced.json::<Value>()["address"], "9 West Rd");

    let listed = server.get(routes::libraries::COLLECTION).await;
    assert_eq!(listed.json::<Value>().as_array().map(Vec::len), Some(1));

    server.delete(&item).await.assert_status(StatusCode::NO_CONTENT);

    let gone = server.get(&item).await;
    gone.assert_status_not_found();
    assert_eq!(gone.json::<Value>(), json!({ "error": "Library not found" }));
    Ok(())
}

#[tokio::test]
async fn book_payload_expands_links() -> Result<()> {
    let server = test_server()?;
    let library = create_library(&server).await;

    let author = server
        .post(routes::authors::COLLECTION)
        .json(&json!({ "name": "J. R. R. Tolkien" }))
        .await;
    author.assert_status(StatusCode::CREATED);
    let author = id_of(&author.json::<Value>());

    let category = server
        .post(routes::categories::COLLECTION)
        .json(&json!({ "name": "Fantasy" }))
        .await;
    category.assert_status(StatusCode::CREATED);
    let category = id_of(&category.json::<Value>());

    let created = server
        .post(routes::books::COLLECTION)
        .json(&json!({
            "title": "The Silmarillion",
            "isbn": "9780048231536",
            "library": library,
            "author_ids": [author],
            "category_ids": [category],
            "publication_date": "1977-09-15",
            "publisher": "Allen & Unwin",
            "total_copies": 2,
            "available_copies": 2,
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let body = created.json::<Value>();
    assert_eq!(body["library"], library);
    assert_eq!(body["authors"][0]["name"], "J. R. R. Tolkien");
    assert_eq!(body["categories"][0]["name"], "Fantasy");
    assert!(body.get("author_ids").is_none());

    let dangling = server
        .post(routes::books::COLLECTION)
        .json(&json!({
            "title": "Unfinished Tales",
            "isbn": "9780048231796",
            "library": library,
            "author_ids": [author + 100],
            "publication_date": "1980-01-01",
            "publisher": "Allen & Unwin",
            "total_copies": 1,
            "available_copies": 1,
        }))
        .await;
    dangling.assert_status_bad_request();
    assert_eq!(dangling.json::<Value>()["field"], "author_ids");
    Ok(())
}

#[tokio::test]
async fn book_rejects_more_available_than_total() -> Result<()> {
    let server = test_server()?;
    let library = create_library(&server).await;

    let response = server
        .post(routes::books::COLLECTION)
        .json(&json!({
            "title": "Overstocked",
            "isbn": "1111111111",
            "library": library,
            "publication_date": "2001-01-01",
            "publisher": "Nobody",
            "total_copies": 1,
            "available_copies": 2,
        }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["field"], "available_copies");
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() -> Result<()> {
    let server = test_server()?;

    let response = server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": "one" }))
        .await;

    response.assert_status_bad_request();
    assert!(response.json::<Value>()["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn non_numeric_path_id_uses_error_body() -> Result<()> {
    let server = test_server()?;

    for path in [
        "/api/libraries/abc/",
        "/api/books/abc/availability/",
        "/api/members/abc/borrowings/",
    ] {
        let response = server.get(path).await;
        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert!(body["error"].is_string(), "{path}: {body}");
    }

    let response = server.delete("/api/reviews/1.5/").await;
    response.assert_status_bad_request();
    assert!(response.json::<Value>()["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn borrow_and_return_flow() -> Result<()> {
    let server = test_server()?;
    let library = create_library(&server).await;
    let book = create_book(&server, library, "9780261103344", 3).await;
    let member = create_member(&server, library, "ada@reader.test").await;

    let borrowed = server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": book, "member_id": member, "days": 7 }))
        .await;
    borrowed.assert_status(StatusCode::CREATED);
    let loan = borrowed.json::<Value>();
    assert_eq!(loan["book"], book);
    assert_eq!(loan["member"], member);
    assert_eq!(loan["is_returned"], false);
    assert_eq!(loan["member_name"], "Ada Reader");
    assert_eq!(loan["book_details"]["available_copies"], 2);

    let availability = server
        .get(&with_id(routes::books::AVAILABILITY, book))
        .await
        .json::<Value>();
    assert_eq!(
        availability,
        json!({
            "book_id": book,
            "title": "The Hobbit",
            "is_available": true,
            "available_copies": 2,
            "total_copies": 3,
        })
    );

    let returned = server
        .post(routes::books::RETURN)
        .json(&json!({ "borrowing_id": id_of(&loan) }))
        .await;
    returned.assert_status_ok();
    let returned = returned.json::<Value>();
    assert_eq!(returned["is_returned"], true);
    assert!(returned["return_date"].is_string());
    assert_eq!(returned["book_details"]["available_copies"], 3);

    let again = server
        .post(routes::books::RETURN)
        .json(&json!({ "borrowing_id": id_of(&loan) }))
        .await;
    again.assert_status_bad_request();
    assert_eq!(again.json::<Value>(), json!({ "error": "Book already returned" }));
    Ok(())
}

#[tokio::test]
async fn borrow_rejections_use_error_body() -> Result<()> {
    let server = test_server()?;
    let library = create_library(&server).await;
    let book = create_book(&server, library, "0000000001", 1).await;
    let first = create_member(&server, library, "first@reader.test").await;
    let second = create_member(&server, library, "second@reader.test").await;

    server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": book, "member_id": first }))
        .await
        .assert_status(StatusCode::CREATED);

    let unavailable = server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": book, "member_id": second }))
        .await;
    unavailable.assert_status_bad_request();
    assert_eq!(unavailable.json::<Value>(), json!({ "error": "Book not available" }));

    let other = create_book(&server, library, "0000000002", 1).await;
    server
        .patch(&with_id(routes::members::ITEM, second))
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_ok();
    let inactive = server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": other, "member_id": second }))
        .await;
    inactive.assert_status_bad_request();
    assert_eq!(inactive.json::<Value>(), json!({ "error": "Member is not active" }));

    let missing = server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": other + 50, "member_id": first }))
        .await;
    missing.assert_status_not_found();
    assert_eq!(missing.json::<Value>(), json!({ "error": "Book not found" }));

    let missing_loan = server
        .post(routes::books::RETURN)
        .json(&json!({ "borrowing_id": 999 }))
        .await;
    missing_loan.assert_status_not_found();
    assert_eq!(missing_loan.json::<Value>(), json!({ "error": "Borrowing not found" }));
    Ok(())
}

#[tokio::test]
async fn loan_length_is_bounded_by_configuration() -> Result<()> {
    let server = common::test_server_with_env(EnvConfig {
        max_loan_days: Some(30),
        ..EnvConfig::default()
    })?;
    let library = create_library(&server).await;
    let book = create_book(&server, library, "0000000003", 1).await;
    let member = create_member(&server, library, "bounded@reader.test").await;

    let too_long = server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": book, "member_id": member, "days": 31 }))
        .await;
    too_long.assert_status_bad_request();
    assert_eq!(too_long.json::<Value>()["field"], "days");

    server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": book, "member_id": member, "days": 30 }))
        .await
        .assert_status(StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn member_borrowings_newest_first() -> Result<()> {
    let server = test_server()?;
    let library = create_library(&server).await;
    let member = create_member(&server, library, "history@reader.test").await;
    let first = create_book(&server, library, "0000000010", 1).await;
    let second = create_book(&server, library, "0000000011", 1).await;

    for book in [first, second] {
        server
            .post(routes::books::BORROW)
            .json(&json!({ "book_id": book, "member_id": member }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let listed = server
        .get(&with_id(routes::members::BORROWINGS, member))
        .await;
    listed.assert_status_ok();
    let books: Vec<i64> = listed
        .json::<Value>()
        .as_array()
        .map(|items| items.iter().filter_map(|b| b["book"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(books, vec![second, first]);

    server
        .get(&with_id(routes::members::BORROWINGS, member + 1))
        .await
        .assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn deleting_active_borrowing_frees_copy() -> Result<()> {
    let server = test_server()?;
    let library = create_library(&server).await;
    let book = create_book(&server, library, "0000000020", 1).await;
    let member = create_member(&server, library, "delete@reader.test").await;

    let loan = server
        .post(routes::borrowings::COLLECTION)
        .json(&json!({ "book": book, "member": member, "due_date": "2030-01-01" }))
        .await;
    loan.assert_status(StatusCode::CREATED);
    let loan = id_of(&loan.json::<Value>());

    let due = server
        .patch(&with_id(routes::borrowings::ITEM, loan))
        .json(&json!({ "due_date": "2030-02-01" }))
        .await;
    due.assert_status_ok();
    assert_eq!(due.json::<Value>()["due_date"], "2030-02-01");

    server
        .delete(&with_id(routes::borrowings::ITEM, loan))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let availability = server
        .get(&with_id(routes::books::AVAILABILITY, book))
        .await
        .json::<Value>();
    assert_eq!(availability["available_copies"], 1);
    Ok(())
}

#[tokio::test]
async fn reviews_are_unique_per_member_and_book() -> Result<()> {
    let server = test_server()?;
    let library = create_library(&server).await;
    let book = create_book(&server, library, "0000000030", 1).await;
    let member = create_member(&server, library, "critic@reader.test").await;

    let review = server
        .post(routes::reviews::COLLECTION)
        .json(&json!({ "book": book, "member": member, "rating": 4, "comment": "Good" }))
        .await;
    review.assert_status(StatusCode::CREATED);
    assert_eq!(review.json::<Value>()["member_name"], "Ada Reader");

    let duplicate = server
        .post(routes::reviews::COLLECTION)
        .json(&json!({ "book": book, "member": member, "rating": 5 }))
        .await;
    duplicate.assert_status_bad_request();

    let out_of_range = server
        .patch(&with_id(routes::reviews::ITEM, id_of(&review.json::<Value>())))
        .json(&json!({ "rating": 6 }))
        .await;
    out_of_range.assert_status_bad_request();
    assert_eq!(out_of_range.json::<Value>()["field"], "rating");
    Ok(())
}

#[tokio::test]
async fn search_and_statistics() -> Result<()> {
    let server = test_server()?;

    let empty = server.get(routes::STATISTICS).await;
    empty.assert_status_ok();
    let empty = empty.json::<Value>();
    assert_eq!(empty["total_books"], 0);
    assert!(empty["average_rating"].is_null());
    assert_eq!(empty["most_borrowed_books"], json!([]));

    let library = create_library(&server).await;
    let hobbit = create_book(&server, library, "0000000040", 2).await;
    let member = create_member(&server, library, "stats@reader.test").await;
    server
        .post(routes::books::BORROW)
        .json(&json!({ "book_id": hobbit, "member_id": member }))
        .await
        .assert_status(StatusCode::CREATED);

    let hits = server
        .get(routes::books::SEARCH)
        .add_query_param("q", "HOBBIT")
        .await;
    hits.assert_status_ok();
    let hits = hits.json::<Value>();
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["id"], hobbit);

    let none = server
        .get(routes::books::SEARCH)
        .add_query_param("q", "silmarillion")
        .await
        .json::<Value>();
    assert_eq!(none, json!([]));

    let stats = server.get(routes::STATISTICS).await.json::<Value>();
    assert_eq!(stats["total_books"], 1);
    assert_eq!(stats["total_members"], 1);
    assert_eq!(stats["active_borrowings"], 1);
    assert_eq!(stats["total_libraries"], 1);
    assert_eq!(
        stats["most_borrowed_books"],
        json!([{ "book_id": hobbit, "title": "The Hobbit", "borrow_count": 1 }])
    );
    Ok(())
}
