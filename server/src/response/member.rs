use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{MemberDto, StatusCountDto};
use kernel::prelude::entity::{MemberStatus, Page};

use crate::controller::Exhaust;
use crate::response::{ApiResponse, PageResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    member_id: Uuid,
    email: String,
    name: String,
    phone: Option<String>,
    status: MemberStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<MemberDto> for MemberResponse {
    fn from(value: MemberDto) -> Self {
        Self {
            member_id: value.id,
            email: value.email,
            name: value.name,
            phone: value.phone,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusCountResponse {
    status: MemberStatus,
    count: i64,
}

pub struct MemberPresenter;

impl Exhaust<()> for MemberPresenter {
    type To = ApiResponse<()>;
    fn emit(&self, input: ()) -> Self::To {
        ApiResponse::success(input).without_data()
    }
}

impl Exhaust<i64> for MemberPresenter {
    type To = ApiResponse<i64>;
    fn emit(&self, input: i64) -> Self::To {
        ApiResponse::success(input)
    }
}

impl Exhaust<MemberDto> for MemberPresenter {
    type To = ApiResponse<MemberResponse>;
    fn emit(&self, input: MemberDto) -> Self::To {
        ApiResponse::success(MemberResponse::from(input))
    }
}

impl Exhaust<Page<MemberDto>> for MemberPresenter {
    type To = ApiResponse<PageResponse<MemberResponse>>;
    fn emit(&self, input: Page<MemberDto>) -> Self::To {
        ApiResponse::success(PageResponse::from_page(input, MemberResponse::from))
    }
}

impl Exhaust<Vec<StatusCountDto>> for MemberPresenter {
    type To = ApiResponse<Vec<StatusCountResponse>>;
    fn emit(&self, input: Vec<StatusCountDto>) -> Self::To {
        let counts = input
            .into_iter()
            .map(|StatusCountDto { status, count }| StatusCountResponse { status, count })
            .collect();
        ApiResponse::success(counts)
    }
}
