/// Fixed body of `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to the Dummy App!";

/// `GET /`
pub async fn home() -> &'static str {
    WELCOME_MESSAGE
}
