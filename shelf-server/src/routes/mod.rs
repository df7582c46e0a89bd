use axum::{
    Router,
    routing::{get, post},
};

use shelf_core::api_types::routes::{
    STATISTICS, authors, books, borrowings, categories, libraries, members,
    reviews,
};

use crate::{
    AppState,
    handlers::{
        books as book_handlers, borrowings as borrowing_handlers,
        classification, libraries as library_handlers,
        members as member_handlers, reviews as review_handlers, statistics,
    },
};

/// Every `/api` route. Static book paths (`search`, `borrow`, `return`)
/// win over `{id}` in axum's matcher.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(circulation_routes())
        .merge(patron_routes())
        .route(STATISTICS, get(statistics::statistics))
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            libraries::COLLECTION,
            get(library_handlers::list_libraries)
                .post(library_handlers::create_library),
        )
        .route(
            libraries::ITEM,
            get(library_handlers::get_library)
                .put(library_handlers::update_library)
                .patch(library_handlers::patch_library)
                .delete(library_handlers::delete_library),
        )
        .route(
            authors::COLLECTION,
            get(classification::list_authors).post(classification::create_author),
        )
        .route(
            authors::ITEM,
            get(classification::get_author)
                .put(classification::update_author)
                .patch(classification::patch_author)
                .delete(classification::delete_author),
        )
        .route(
            categories::COLLECTION,
            get(classification::list_categories)
                .post(classification::create_category),
        )
        .route(
            categories::ITEM,
            get(classification::get_category)
                .put(classification::update_category)
                .patch(classification::patch_category)
                .delete(classification::delete_category),
        )
        .route(
            books::COLLECTION,
            get(book_handlers::list_books).post(book_handlers::create_book),
        )
        .route(books::SEARCH, get(book_handlers::search_books))
        .route(
            books::ITEM,
            get(book_handlers::get_book)
                .put(book_handlers::update_book)
                .patch(book_handlers::patch_book)
                .delete(book_handlers::delete_book),
        )
        .route(books::AVAILABILITY, get(book_handlers::book_availability))
}

fn circulation_routes() -> Router<AppState> {
    Router::new()
        .route(books::BORROW, post(borrowing_handlers::borrow_book))
        .route(books::RETURN, post(borrowing_handlers::return_book))
        .route(
            borrowings::COLLECTION,
            get(borrowing_handlers::list_borrowings)
                .post(borrowing_handlers::create_borrowing),
        )
        .route(
            borrowings::ITEM,
            get(borrowing_handlers::get_borrowing)
                .put(borrowing_handlers::update_borrowing)
                .patch(borrowing_handlers::patch_borrowing)
                .delete(borrowing_handlers::delete_borrowing),
        )
}

fn patron_routes() -> Router<AppState> {
    Router::new()
        .route(
            members::COLLECTION,
            get(member_handlers::list_members).post(member_handlers::create_member),
        )
        .route(
            members::ITEM,
            get(member_handlers::get_member)
                .put(member_handlers::update_member)
                .patch(member_handlers::patch_member)
                .delete(member_handlers::delete_member),
        )
        .route(members::BORROWINGS, get(member_handlers::member_borrowings))
        .route(
            reviews::COLLECTION,
            get(review_handlers::list_reviews).post(review_handlers::create_review),
        )
        .route(
            reviews::ITEM,
            get(review_handlers::get_review)
                .put(review_handlers::update_review)
                .patch(review_handlers::patch_review)
                .delete(review_handlers::delete_review),
        )
}
