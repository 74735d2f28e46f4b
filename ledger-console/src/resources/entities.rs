use console_core::error::ApiError;

use super::{Remote, Resource, Snapshot};
use crate::models::{Entity, NewEntity};

/// Every entity visible to the session.
pub struct Entities {
    remote: Remote,
    resource: Resource<(), Vec<Entity>>,
}

impl Entities {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            resource: Resource::new(),
        }
    }

    pub async fn load(&self) {
        let remote = self.remote.clone();
        self.resource
            .sync(Some(()), move |_| async move {
                remote.api.list_entities(remote.token.as_deref()).await
            })
            .await;
    }

    pub async fn reload(&self) {
        let remote = self.remote.clone();
        self.resource
            .reload(move |_| async move {
                remote.api.list_entities(remote.token.as_deref()).await
            })
            .await;
    }

    pub async fn add(&self, entity: &NewEntity) -> Result<Entity, ApiError> {
        self.resource
            .create(
                self.remote
                    .api
                    .create_entity(entity, self.remote.token.as_deref()),
            )
            .await
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Entity>> {
        self.resource.snapshot()
    }
}
