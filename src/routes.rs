// src/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    // Vendas
    let sales_routes = Router::new()
        .route("/"
               ,post(handlers::sales::create_sale)
               .get(handlers::sales::list_sales)
        )
        .route("/{id}"
               ,get(handlers::sales::get_sale)
               .delete(handlers::sales::delete_sale)
        );

    // Integração com o Asaas (clientes e cobranças)
    let asaas_routes = Router::new()
        .route("/clientes", post(handlers::customers::create_customer))
        .route("/clientes/{venda_id}"
               ,put(handlers::customers::update_customer)
               .delete(handlers::customers::delete_customer)
        )
        .route("/cobrancas"
               ,post(handlers::charges::create_charge)
               .get(handlers::charges::list_charges)
        )
        .route("/cobrancas/{venda_id}"
               ,put(handlers::charges::update_charge)
               .delete(handlers::charges::delete_charge)
        );

    // Webhooks (públicos: chamados pelos parceiros)
    let webhook_routes = Router::new()
        .route("/asaas", post(handlers::webhooks::asaas))
        .route("/autentique", post(handlers::webhooks::autentique))
        .route("/documento", post(handlers::webhooks::document));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/logs"
               ,get(handlers::logs::list_logs)
               .post(handlers::logs::create_log)
        )
        .route("/api/pdf-proxy", get(handlers::documents::proxy_pdf))
        .route("/api/dashboard/resumo", get(handlers::dashboard::get_summary))
        .nest("/api/vendas", sales_routes)
        .nest("/api/asaas", asaas_routes)
        .nest("/api/webhooks", webhook_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
