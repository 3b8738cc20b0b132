//! Runtime configuration, read once at startup from the environment.

use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Secret used to sign and verify every bearer token.
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    /// ISO currency code handed to the payment gateway.
    pub currency: String,
}

impl AppConfig {
    /// Environment variables: `PORT`, `JWT_SECRET`, `ADMIN_EMAIL`,
    /// `ADMIN_PASSWORD`, `CURRENCY`. Development defaults apply when
    /// unset or unparseable.
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_owned()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@medibook.dev".to_owned()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin12345".to_owned()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "USD".to_owned()),
        }
    }

    /// The admin "session" is a fixed shared secret: the decoded admin
    /// token must equal this concatenation exactly.
    pub fn admin_claim(&self) -> String {
        format!("{}{}", self.admin_email, self.admin_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_claim_is_plain_concatenation() {
        let config = AppConfig {
            port: 0,
            jwt_secret: "s".to_owned(),
            admin_email: "root@x.io".to_owned(),
            admin_password: "pw".to_owned(),
            currency: "USD".to_owned(),
        };
        assert_eq!(config.admin_claim(), "root@x.iopw");
    }
}
