use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Router;
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use application::service::{
    CreateBookService, DeleteBookService, GetBookService, UpdateBookService,
};
use kernel::prelude::entity::{BookCategory, BookFilter, BookStatus};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookByIsbnRequest, GetBookRequest,
    KeywordQuery, LowStockQuery, PageQuery, PriceRangeQuery, QuantityQuery, StatusQuery,
    UpdateBookRequest,
};
use crate::response::BookPresenter;
use crate::route::{JsonBody, PathParam, QueryParams};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/api/books",
            get(
                |State(module): State<AppModule>,
                 WithRejection(page, _): QueryParams<PageQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((BookFilter::All, page.0))?
                        .handle(|dto| async move { module.list_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 WithRejection(req, _): JsonBody<CreateBookRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(req.0)?
                        .handle(|dto| async move { module.create_book(dto).await })
                        .await
                        .map(|res| {
                            res.with_message("Book registered successfully")
                                .with_status(StatusCode::CREATED)
                        })
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/:id",
            get(
                |State(module): State<AppModule>, WithRejection(id, _): PathParam<Uuid>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id.0))
                        .handle(|dto| async move { module.get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule>,
                 WithRejection(id, _): PathParam<Uuid>,
                 WithRejection(req, _): JsonBody<UpdateBookRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((id.0, req.0))?
                        .handle(|dto| async move { module.update_book(dto).await })
                        .await
                        .map(|res| res.with_message("Book updated"))
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, WithRejection(id, _): PathParam<Uuid>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id.0))
                        .handle(|dto| async move { module.delete_book(dto).await })
                        .await
                        .map(|res| res.with_message("Book deleted"))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/isbn/:isbn",
            get(
                |State(module): State<AppModule>, WithRejection(isbn, _): PathParam<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookByIsbnRequest::new(isbn.0))
                        .handle(|dto| async move { module.get_book_by_isbn(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/search/title",
            get(
                |State(module): State<AppModule>,
                 WithRejection(query, _): QueryParams<KeywordQuery>| async move {
                    let (keyword, page) = query.0.into_parts();
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((BookFilter::TitleContains(keyword), page))?
                        .handle(|dto| async move { module.list_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/search/author",
            get(
                |State(module): State<AppModule>,
                 WithRejection(query, _): QueryParams<KeywordQuery>| async move {
                    let (keyword, page) = query.0.into_parts();
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((BookFilter::AuthorContains(keyword), page))?
                        .handle(|dto| async move { module.list_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/search",
            get(
                |State(module): State<AppModule>,
                 WithRejection(query, _): QueryParams<KeywordQuery>| async move {
                    let (keyword, page) = query.0.into_parts();
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((BookFilter::Keyword(keyword), page))?
                        .handle(|dto| async move { module.list_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/category/:category",
            get(
                |State(module): State<AppModule>,
                 WithRejection(category, _): PathParam<String>,
                 WithRejection(page, _): QueryParams<PageQuery>| async move {
                    let filter = BookFilter::Category(BookCategory::new(category.0));
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((filter, page.0))?
                        .handle(|dto| async move { module.list_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/status/:status",
            get(
                |State(module): State<AppModule>,
                 WithRejection(status, _): PathParam<BookStatus>,
                 WithRejection(page, _): QueryParams<PageQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((BookFilter::Status(status.0), page.0))?
                        .handle(|dto| async move { module.list_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/price",
            get(
                |State(module): State<AppModule>,
                 WithRejection(query, _): QueryParams<PriceRangeQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(query.0)?
                        .handle(|dto| async move { module.list_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/categories/count",
            get(|State(module): State<AppModule>| async move {
                Controller::new(BookTransformer, BookPresenter)
                    .bypass(|| async move { module.count_books_by_category().await })
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/api/books/low-stock",
            get(
                |State(module): State<AppModule>,
                 WithRejection(query, _): QueryParams<LowStockQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(query.0)?
                        .handle(|dto| async move { module.list_low_stock_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/:id/stock/add",
            patch(
                |State(module): State<AppModule>,
                 WithRejection(id, _): PathParam<Uuid>,
                 WithRejection(query, _): QueryParams<QuantityQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id.0, query.0))
                        .handle(|dto| async move { module.add_stock(dto).await })
                        .await
                        .map(|res| res.with_message("Stock added"))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/:id/stock/remove",
            patch(
                |State(module): State<AppModule>,
                 WithRejection(id, _): PathParam<Uuid>,
                 WithRejection(query, _): QueryParams<QuantityQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id.0, query.0))
                        .handle(|dto| async move { module.remove_stock(dto).await })
                        .await
                        .map(|res| res.with_message("Stock removed"))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/:id/status",
            patch(
                |State(module): State<AppModule>,
                 WithRejection(id, _): PathParam<Uuid>,
                 WithRejection(query, _): QueryParams<StatusQuery>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id.0, query.0))
                        .handle(|dto| async move { module.change_book_status(dto).await })
                        .await
                        .map(|res| res.with_message("Book status changed"))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
