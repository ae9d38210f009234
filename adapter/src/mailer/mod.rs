use async_trait::async_trait;
use kernel::{
    model::{reservation::Reservation, user::User},
    notifier::ReservationNotifier,
};
use shared::{
    config::MailConfig,
    error::{AppError, AppResult},
};

/// Posts reservation-created notifications to a mail gateway webhook.
/// With no webhook configured this is a no-op, which keeps local
/// development and tests free of outbound traffic.
pub struct MailNotifier {
    client: reqwest::Client,
    config: MailConfig,
}

impl MailNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ReservationNotifier for MailNotifier {
    async fn notify_created(&self, reservation: &Reservation, acting_user: &User) -> AppResult<()> {
        let Some(url) = self.config.webhook_url.as_deref() else {
            tracing::debug!("mail webhook not configured, skipping notification");
            return Ok(());
        };

        let subject = format!("New Reservation: {}", reservation.title);
        let body = format!(
            "{} reserved {} on {} from {} to {}.",
            acting_user.user_name,
            reservation.room.name,
            reservation.date,
            reservation.start_time.format("%H:%M"),
            reservation.end_time.format("%H:%M"),
        );
        let payload = serde_json::json!({
            "from": self.config.from,
            "to": reservation.reserved_by.email,
            "subject": subject,
            "body": body,
        });

        let res = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;
        if !res.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "mail gateway returned {}",
                res.status()
            )));
        }
        Ok(())
    }
}
