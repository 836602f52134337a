use std::env;

/// Configuration for the public-facing gateway process.
///
/// Built once at startup and passed down explicitly; nothing reads the
/// process environment after this point.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Address of the administrator service's command listener.
    pub administrator_addr: String,
    /// Shared secret used to verify bearer tokens minted by the
    /// administrator service.
    pub jwt_secret: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            administrator_addr: env::var("ADMINISTRATOR_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8875".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Configuration for the internal administrator process.
#[derive(Debug, Clone)]
pub struct AdministratorConfig {
    /// Address the command listener binds to.
    pub listen_addr: String,
    /// Shared secret used to sign bearer tokens.
    pub jwt_secret: String,
    /// Shared secret from which the transport cipher key is derived.
    pub cipher_secret: String,
    /// bcrypt cost factor for at-rest password hashing.
    pub bcrypt_cost: u32,
}

impl AdministratorConfig {
    pub fn from_env() -> Self {
        Self {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:8875".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            cipher_secret: env::var("CIPHER_SECRET").expect("CIPHER_SECRET must be set"),
            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                .parse()
                .expect("BCRYPT_COST must be a number"),
        }
    }
}
