/// Success response envelopes
///
/// Every success body carries `success: true`. Single resources ride under
/// `data`, paginated collections spread their page metadata at the top
/// level next to `data`.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use listora_shared::pagination::Paginated;
use serde::Serialize;

/// Body for single-resource and message responses
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Body for paginated collection responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub data: Vec<T>,
}

/// 200 with a data payload
pub fn ok<T: Serialize>(data: T) -> Response {
    Json(DataResponse {
        success: true,
        message: None,
        data: Some(data),
    })
    .into_response()
}

/// 200 with a message only (deletes)
pub fn ok_message(message: impl Into<String>) -> Response {
    Json(DataResponse::<()> {
        success: true,
        message: Some(message.into()),
        data: None,
    })
    .into_response()
}

/// 201 with a message and the created resource
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(DataResponse {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }),
    )
        .into_response()
}

/// 200 with a page of results and its metadata
pub fn page<T: Serialize>(paginated: Paginated<T>) -> Response {
    Json(PaginatedResponse {
        success: true,
        count: paginated.count,
        total: paginated.total,
        total_pages: paginated.total_pages,
        current_page: paginated.current_page,
        data: paginated.data,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use listora_shared::pagination::Page;

    #[test]
    fn test_ok_status() {
        assert_eq!(ok(serde_json::json!({"a": 1})).status(), StatusCode::OK);
        assert_eq!(ok_message("Deleted").status(), StatusCode::OK);
    }

    #[test]
    fn test_created_status() {
        assert_eq!(
            created("Created", serde_json::json!({})).status(),
            StatusCode::CREATED
        );
    }

    #[test]
    fn test_paginated_body_shape() {
        let body = PaginatedResponse {
            success: true,
            count: 2,
            total: 12,
            total_pages: 6,
            current_page: 1,
            data: vec![1, 2],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json.get("success").unwrap(), true);
        assert_eq!(json.get("totalPages").unwrap(), 6);
        assert_eq!(json.get("currentPage").unwrap(), 1);
    }

    #[test]
    fn test_page_helper() {
        let paginated = Paginated::new(vec![1, 2, 3], 3, Page::default());
        assert_eq!(page(paginated).status(), StatusCode::OK);
    }
}
