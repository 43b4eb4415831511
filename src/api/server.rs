use axum::{response::Html, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthInfo {
    pub status: String,
    pub version: String,
    pub build_time: String,
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Bookshelf API</title>
    <style>
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 0;
            background-color: #f4f7f6;
            color: #333;
            display: flex;
            justify-content: center;
            align-items: center;
            min-height: 100vh;
            text-align: center;
        }
        .container {
            background-color: #ffffff;
            padding: 40px 60px;
            border-radius: 10px;
            box-shadow: 0 5px 15px rgba(0, 0, 0, 0.1);
            max-width: 600px;
            width: 90%;
        }
        h1 { color: #2c3e50; }
        code {
            background-color: #e8f0fe;
            color: #1967d2;
            padding: 3px 6px;
            border-radius: 4px;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Bookshelf API</h1>
        <p>The server is up and ready to handle requests.</p>
        <p>Books live under <code>/api/books</code>. Interactive documentation is at <code>/api/doc/</code>.</p>
    </div>
</body>
</html>"#;

/// GET / - static landing page
#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses((status = 200, description = "Landing page", content_type = "text/html", body = String))
)]
pub async fn home() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// GET /api/health - 健康检查
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "meta",
    responses((status = 200, description = "Service is up", body = HealthInfo))
)]
pub async fn health_check() -> Json<HealthInfo> {
    Json(HealthInfo {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_time: env!("BUILD_TIME").to_string(),
    })
}
