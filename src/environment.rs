use std::sync::Arc;

use crate::allocator::IdAllocator;
use crate::db::Db;
use crate::log::Logger;

/// Everything a handler needs, cloned into each route. Handlers are
/// stateless across requests; shared state lives in the store and the
/// allocator.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<dyn Db + Send + Sync>,
    pub allocator: Arc<IdAllocator>,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        db: Arc<dyn Db + Send + Sync>,
        allocator: Arc<IdAllocator>,
    ) -> Self {
        Self {
            logger,
            db,
            allocator,
        }
    }
}
