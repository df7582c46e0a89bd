//! Route table shared by the server and its HTTP tests.

macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

pub const ROOT: &str = "/api";
pub const PING: &str = "/ping";
pub const HEALTH: &str = "/health";

pub mod libraries {
    pub const COLLECTION: &str = api_path!("/libraries/");
    pub const ITEM: &str = api_path!("/libraries/{id}/");
}

pub mod authors {
    pub const COLLECTION: &str = api_path!("/authors/");
    pub const ITEM: &str = api_path!("/authors/{id}/");
}

pub mod categories {
    pub const COLLECTION: &str = api_path!("/categories/");
    pub const ITEM: &str = api_path!("/categories/{id}/");
}

pub mod books {
    pub const COLLECTION: &str = api_path!("/books/");
    pub const ITEM: &str = api_path!("/books/{id}/");
    pub const SEARCH: &str = api_path!("/books/search/");
    pub const BORROW: &str = api_path!("/books/borrow/");
    pub const RETURN: &str = api_path!("/books/return/");
    pub const AVAILABILITY: &str = api_path!("/books/{id}/availability/");
}

pub mod members {
    pub const COLLECTION: &str = api_path!("/members/");
    pub const ITEM: &str = api_path!("/members/{id}/");
    pub const BORROWINGS: &str = api_path!("/members/{id}/borrowings/");
}

pub mod borrowings {
    pub const COLLECTION: &str = api_path!("/borrowings/");
    pub const ITEM: &str = api_path!("/borrowings/{id}/");
}

pub mod reviews {
    pub const COLLECTION: &str = api_path!("/reviews/");
    pub const ITEM: &str = api_path!("/reviews/{id}/");
}

pub const STATISTICS: &str = api_path!("/statistics/");

pub mod utils {
    /// Fill the `{id}` segment of an item route.
    pub fn with_id(route: &str, id: impl std::fmt::Display) -> String {
        route.replace("{id}", &id.to_string())
    }
}
