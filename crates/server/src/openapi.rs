use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SubmitRequestDoc {
    #[schema(value_type = Object)]
    pub dict: serde_json::Value,
}

#[derive(ToSchema)]
pub struct SubmitResponseDoc {
    pub message: String,
    #[schema(value_type = Object)]
    pub dict: serde_json::Value,
}

#[derive(ToSchema)]
pub struct FetchResponseDoc {
    #[schema(value_type = Object)]
    pub dict: serde_json::Value,
}

#[derive(ToSchema)]
pub struct ErrorResponseDoc { pub error: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::dictionary::submit_dictionary,
        crate::routes::dictionary::submit_synonyms,
        crate::routes::dictionary::fetch_dictionary,
    ),
    components(
        schemas(
            HealthResponse,
            SubmitRequestDoc,
            SubmitResponseDoc,
            FetchResponseDoc,
            ErrorResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "dictionary")
    )
)]
pub struct ApiDoc;
