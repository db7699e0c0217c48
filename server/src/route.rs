mod book;
mod member;

pub use self::{book::*, member::*};

use axum::extract::{Path, Query};
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::error::ErrorStatus;

type JsonBody<T> = WithRejection<Json<T>, ErrorStatus>;
type QueryParams<T> = WithRejection<Query<T>, ErrorStatus>;
type PathParam<T> = WithRejection<Path<T>, ErrorStatus>;
