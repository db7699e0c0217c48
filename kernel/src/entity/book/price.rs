use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookPrice(i32);

impl BookPrice {
    pub fn new(price: impl Into<i32>) -> Self {
        Self(price.into())
    }
}
