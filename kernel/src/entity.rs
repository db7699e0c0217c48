mod book;
mod common;
mod member;

pub use self::{book::*, common::*, member::*};
