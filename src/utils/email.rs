use uuid::Uuid;

/// Best-effort notification boundary. Delivery is owned by the mail
/// service; this module formats the message and hands it off without
/// ever letting a failure reach the caller. Bookings and cancellations
/// must succeed whether or not the confirmation goes out.
#[derive(Debug)]
pub struct EmailMessage {
    pub message_id: Uuid,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(recipients: Vec<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            recipients,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Queue a message for delivery after the surrounding transaction has
/// committed. Fire-and-forget: errors are logged and swallowed.
pub fn dispatch(message: EmailMessage) {
    tokio::spawn(async move {
        if let Err(e) = deliver(&message).await {
            tracing::warn!(
                message_id = %message.message_id,
                subject = %message.subject,
                error = %e,
                "Email delivery failed; continuing"
            );
        }
    });
}

async fn deliver(message: &EmailMessage) -> Result<(), String> {
    if message.recipients.is_empty() {
        return Err("no recipients".to_string());
    }

    // Hand-off point for the mail relay.
    tracing::info!(
        message_id = %message.message_id,
        recipients = message.recipients.len(),
        subject = %message.subject,
        "Email queued for delivery"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_rejects_empty_recipients() {
        let message = EmailMessage::new(vec![], "subject", "body");
        assert!(deliver(&message).await.is_err());
    }

    #[tokio::test]
    async fn test_deliver_accepts_recipients() {
        let message = EmailMessage::new(vec!["a@b.c".to_string()], "subject", "body");
        assert!(deliver(&message).await.is_ok());
    }
}
