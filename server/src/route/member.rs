use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Router;
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use application::service::{
    DeleteMemberService, GetMemberService, RegisterMemberService, UpdateMemberService,
};
use kernel::prelude::entity::{MemberFilter, MemberStatus};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    ChangePasswordRequest, GetMemberByEmailRequest, GetMemberRequest, JoinedQuery,
    MemberIdRequest, MemberTransformer, NameQuery, PageQuery, RegisterMemberRequest,
    UpdateProfileRequest,
};
use crate::response::MemberPresenter;
use crate::route::{JsonBody, PathParam, QueryParams};

pub trait MemberRouter {
    fn route_member(self) -> Self;
}

impl MemberRouter for Router<AppModule> {
    fn route_member(self) -> Self {
        self.route(
            "/api/members",
            get(
                |State(module): State<AppModule>,
                 WithRejection(page, _): QueryParams<PageQuery>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .try_intake((MemberFilter::All, page.0))?
                        .handle(|dto| async move { module.list_members(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 WithRejection(req, _): JsonBody<RegisterMemberRequest>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .try_intake(req.0)?
                        .handle(|dto| async move { module.register_member(dto).await })
                        .await
                        .map(|res| {
                            res.with_message("Member registered")
                                .with_status(StatusCode::CREATED)
                        })
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/:id",
            get(
                |State(module): State<AppModule>, WithRejection(id, _): PathParam<Uuid>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(GetMemberRequest::new(id.0))
                        .handle(|dto| async move { module.get_member(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule>,
                 WithRejection(id, _): PathParam<Uuid>,
                 WithRejection(req, _): JsonBody<UpdateProfileRequest>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .try_intake((id.0, req.0))?
                        .handle(|dto| async move { module.update_profile(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, WithRejection(id, _): PathParam<Uuid>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(MemberIdRequest::new(id.0))
                        .handle(|dto| async move { module.delete_member(dto).await })
                        .await
                        .map(|res| res.with_message("Member permanently deleted"))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/email/:email",
            get(
                |State(module): State<AppModule>, WithRejection(email, _): PathParam<String>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(GetMemberByEmailRequest::new(email.0))
                        .handle(|dto| async move { module.get_member_by_email(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/search",
            get(
                |State(module): State<AppModule>,
                 WithRejection(query, _): QueryParams<NameQuery>| async move {
                    let (name, page) = query.0.into_parts();
                    Controller::new(MemberTransformer, MemberPresenter)
                        .try_intake((MemberFilter::NameContains(name), page))?
                        .handle(|dto| async move { module.list_members(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/status/:status",
            get(
                |State(module): State<AppModule>,
                 WithRejection(status, _): PathParam<MemberStatus>,
                 WithRejection(page, _): QueryParams<PageQuery>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .try_intake((MemberFilter::Status(status.0), page.0))?
                        .handle(|dto| async move { module.list_members(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/joined",
            get(
                |State(module): State<AppModule>,
                 WithRejection(query, _): QueryParams<JoinedQuery>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .try_intake(query.0)?
                        .handle(|dto| async move { module.list_members(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/count/active",
            get(|State(module): State<AppModule>| async move {
                Controller::new(MemberTransformer, MemberPresenter)
                    .bypass(|| async move { module.count_active_members().await })
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/api/members/count/status",
            get(|State(module): State<AppModule>| async move {
                Controller::new(MemberTransformer, MemberPresenter)
                    .bypass(|| async move { module.count_members_by_status().await })
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/api/members/:id/password",
            patch(
                |State(module): State<AppModule>,
                 WithRejection(id, _): PathParam<Uuid>,
                 WithRejection(req, _): JsonBody<ChangePasswordRequest>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .try_intake((id.0, req.0))?
                        .handle(|dto| async move { module.change_password(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/:id/withdraw",
            patch(
                |State(module): State<AppModule>, WithRejection(id, _): PathParam<Uuid>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(MemberIdRequest::new(id.0))
                        .handle(|dto| async move { module.withdraw_member(dto).await })
                        .await
                        .map(|res| res.without_data().with_message("Member withdrawn"))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/:id/activate",
            patch(
                |State(module): State<AppModule>, WithRejection(id, _): PathParam<Uuid>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(MemberIdRequest::new(id.0))
                        .handle(|dto| async move { module.activate_member(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/members/:id/deactivate",
            patch(
                |State(module): State<AppModule>, WithRejection(id, _): PathParam<Uuid>| async move {
                    Controller::new(MemberTransformer, MemberPresenter)
                        .intake(MemberIdRequest::new(id.0))
                        .handle(|dto| async move { module.deactivate_member(dto).await })
                        .await
                        .map(|res| res.with_message("Member deactivated"))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
