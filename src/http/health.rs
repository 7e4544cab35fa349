use actix_web::{HttpResponse, Responder};

pub(crate) async fn healthz() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("ok")
}

/// Answers CORS preflight requests; the headers come from the app-wide defaults.
pub(crate) async fn preflight() -> impl Responder {
    HttpResponse::Ok().finish()
}
