use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::emergency::get_nearby,
        api::emergency::get_numbers,
    ),
    tags(
        (name = "rescue-locator", description = "Nearby emergency services API")
    )
)]
pub struct ApiDoc;
