//! Install confirmation page.

use crate::config::INSTALL_OK_BODY;

/// Root handler. Answers every method with the same constant body.
pub async fn index() -> &'static str {
    INSTALL_OK_BODY
}
