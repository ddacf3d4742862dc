use api_types::user::Profile;

use crate::{error::Result, gateway::Gateway};

pub struct UserApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn profile(&self) -> Result<Profile> {
        self.gateway.get("user").await
    }
}
