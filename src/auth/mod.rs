pub mod middleware;
pub mod token;

pub use middleware::AuthMiddleware;
pub use token::{Claims, TokenIssuer};
