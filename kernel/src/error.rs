use std::fmt::Display;

use error_stack::Context;

/// Entity kind a [`KernelError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Book,
    Member,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Book => write!(f, "Book"),
            Resource::Member => write!(f, "Member"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    NotFound(Resource),
    DuplicateResource,
    InvalidArgument,
    InvalidState,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound(resource) => write!(f, "{resource} not found"),
            KernelError::DuplicateResource => write!(f, "Resource already exists"),
            KernelError::InvalidArgument => write!(f, "Invalid argument"),
            KernelError::InvalidState => write!(f, "Operation not allowed in current state"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
