mod id;
mod operation;
mod page;
mod time;

pub use self::{id::*, operation::*, page::*, time::*};
