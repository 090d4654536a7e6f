use crate::domain::repository::MailPort;
use crate::error::AuthServiceError;

/// Default mail port: traces the send instead of delivering. The real mail
/// service subscribes elsewhere; this keeps local and test environments free
/// of SMTP wiring.
#[derive(Clone, Copy, Default)]
pub struct TracingMailer;

impl MailPort for TracingMailer {
    async fn send_verification_code(
        &self,
        email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), AuthServiceError> {
        tracing::info!(email, username, "verification code issued");
        tracing::debug!(code, "verification code value");
        Ok(())
    }
}
