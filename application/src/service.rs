mod book;
mod member;

pub use self::{book::*, member::*};
