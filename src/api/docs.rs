//! OpenAPI document and Swagger UI page / API 文档

use axum::{response::Html, Json};
use utoipa::OpenApi;

use super::response::{ErrorBody, MessageBody};
use super::server::{self, HealthInfo};
use super::books;
use crate::models::{Book, BookDraft};

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Bookshelf API - Swagger UI</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: "/api/doc/openapi.json", dom_id: "#swagger-ui" });
        };
    </script>
</body>
</html>"##;

/// GET /api/doc/
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

/// GET /api/doc/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// OpenAPI document for every public route / 接口文档
#[derive(OpenApi)]
#[openapi(
    info(title = "Bookshelf API", description = "CRUD API for managing books."),
    paths(
        server::home,
        server::health_check,
        books::list_books,
        books::create_book,
        books::search_books,
        books::get_book,
        books::update_book,
        books::patch_book,
        books::delete_book,
    ),
    components(schemas(Book, BookDraft, ErrorBody, MessageBody, HealthInfo)),
    tags(
        (name = "books", description = "Book records"),
        (name = "meta", description = "Service information")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_swagger_page_points_at_document() {
        let Html(page) = swagger_ui().await;
        assert!(page.contains(r##"dom_id: "#swagger-ui""##));
        assert!(page.contains("/api/doc/openapi.json"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_document_lists_book_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = &doc["paths"];
        for method in ["get", "put", "patch", "delete"] {
            assert!(paths["/api/books/{id}"][method].is_object(), "{} /api/books/{{id}}", method);
        }
        assert!(paths["/api/books"]["get"].is_object());
        assert!(paths["/api/books"]["post"]["requestBody"].is_object());
        assert!(paths["/api/books"]["post"]["responses"]["201"].is_object());
        assert_eq!(paths["/api/books/search"]["get"]["parameters"][0]["name"], "q");
        assert_eq!(paths["/api/books/{id}"]["get"]["parameters"][0]["in"], "path");
        assert!(doc["components"]["schemas"]["Book"].is_object());
        assert!(doc["components"]["schemas"]["ErrorBody"].is_object());
    }
}
