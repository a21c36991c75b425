use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::session::models::IdentityProps;
use crate::inbound::http::middleware::CurrentIdentity;

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> ApiSuccess<MeResponseData> {
    let claims = identity.claims();

    ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            subject_id: claims.sub,
            user: claims.props.clone(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseData {
    pub subject_id: i64,
    pub user: IdentityProps,
}
