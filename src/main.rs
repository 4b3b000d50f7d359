use actix_cors::Cors;
use actix_web::{get, middleware::Logger, post, web, App, HttpResponse, HttpServer};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use malearn_server::{
    app_state::AppState,
    auth::{JwtService, MaybeAuthenticated},
    config::Config,
    graphql::{create_schema, Schema},
    handlers,
    middleware::RequestIdMiddleware,
};

#[post("/api/graphql")]
async fn graphql_endpoint(
    schema: web::Data<Schema>,
    auth: MaybeAuthenticated,
    gql_request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = gql_request.into_inner();
    if let Some(claims) = auth.0 {
        request = request.data(claims);
    }
    schema.execute(request).await.into()
}

#[get("/graphiql")]
async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/api/graphql").finish())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let cors_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to initialize app state: {}", e)))?;
    let schema = create_schema(state.clone());
    let jwt_service: JwtService = state.jwt_service.as_ref().clone();

    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .service(handlers::health_check)
            // Auth: fixed paths before parameterized user routes
            .service(handlers::register)
            .service(handlers::login)
            .service(handlers::refresh_token)
            .service(handlers::logout)
            .service(handlers::me)
            .service(handlers::get_all_users)
            .service(handlers::get_user)
            .service(handlers::update_user)
            .service(handlers::delete_user)
            // Categories
            .service(handlers::list_categories)
            .service(handlers::create_category)
            .service(handlers::delete_category)
            // Courses: fixed paths before parameterized ones
            .service(handlers::list_courses)
            .service(handlers::my_courses)
            .service(handlers::get_course_by_slug)
            .service(handlers::create_course)
            .service(handlers::course_analytics)
            .service(handlers::update_course)
            .service(handlers::delete_course)
            // Enrollments
            .service(handlers::enroll)
            .service(handlers::my_enrollments)
            .service(handlers::course_enrollments)
            .service(handlers::record_lesson_completion)
            .service(handlers::issue_certificate)
            .service(handlers::set_enrollment_status)
            .service(handlers::add_review)
            .service(handlers::get_enrollment)
            .service(handlers::delete_enrollment)
            // Quizzes
            .service(handlers::create_quiz)
            .service(handlers::list_course_quizzes)
            .service(handlers::get_quiz)
            .service(handlers::update_quiz)
            .service(handlers::delete_quiz)
            // GraphQL
            .service(graphql_endpoint)
            .service(graphiql)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
