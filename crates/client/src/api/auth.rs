use api_types::{
    Amount,
    auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SessionUser},
};

use crate::{error::Result, gateway::Gateway, validation::validate_registration};

pub struct AuthApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Exchanges credentials for a token and persists the new session.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser> {
        let res: LoginResponse = self
            .gateway
            .post(
                "auth/login",
                &LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let user = SessionUser {
            username: username.to_string(),
        };
        self.gateway.session().establish(&res.token, user.clone())?;
        tracing::info!("{username} logged in");
        Ok(user)
    }

    /// Creates an account. Input is validated locally first; a failure there
    /// never reaches the network. Does not log the new user in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
        balance: Amount,
    ) -> Result<RegisterResponse> {
        let username = username.trim();
        validate_registration(username, password, confirm_password, balance).into_result()?;

        let res: RegisterResponse = self
            .gateway
            .post(
                "auth/register",
                &RegisterRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                    balance,
                },
            )
            .await?;
        tracing::info!("registered {} (id {})", res.username, res.id);
        Ok(res)
    }

    pub fn logout(&self) {
        self.gateway.session().logout();
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.gateway.session().current_user()
    }
}
