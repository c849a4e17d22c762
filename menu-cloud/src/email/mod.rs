//! Outgoing notifications
//!
//! Delivery is best-effort: every `EmailService` method returns whether the
//! message was handed to the transport, and a failure never fails the request
//! that triggered it.

pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use shared::models::Decision;

use crate::config::Config;
use templates::{EmailTemplate, Links, Mail};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Accepts (recipient, subject, body)
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, mail: &Mail) -> Result<(), BoxError>;
}

/// AWS SES v2 transport
pub struct SesTransport {
    client: SesClient,
    from: String,
}

impl SesTransport {
    pub fn new(client: SesClient, from_name: &str, from_email: &str) -> Self {
        let from = if from_name.trim().is_empty() {
            from_email.to_string()
        } else {
            format!("{from_name} <{from_email}>")
        };
        Self { client, from }
    }
}

#[async_trait]
impl MailTransport for SesTransport {
    async fn send(&self, to: &str, mail: &Mail) -> Result<(), BoxError> {
        let subject = Content::builder()
            .data(&mail.subject)
            .charset("UTF-8")
            .build()?;
        let body = Body::builder()
            .text(Content::builder().data(&mail.body).charset("UTF-8").build()?)
            .build();
        let message = Message::builder().subject(subject).body(body).build();

        self.client
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;
        Ok(())
    }
}

/// Used when no transport is configured; every send fails
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, _to: &str, _mail: &Mail) -> Result<(), BoxError> {
        Err("mail transport disabled".into())
    }
}

#[derive(Clone)]
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    config: Arc<Config>,
}

impl EmailService {
    pub fn new(transport: Arc<dyn MailTransport>, config: Arc<Config>) -> Self {
        Self { transport, config }
    }

    pub fn disabled(config: Arc<Config>) -> Self {
        Self::new(Arc::new(DisabledTransport), config)
    }

    async fn deliver(&self, to: &str, mail: Mail, kind: &'static str) -> bool {
        match self.transport.send(to, &mail).await {
            Ok(()) => {
                tracing::info!(to = to, kind, "Email sent");
                true
            }
            Err(e) => {
                tracing::warn!(to = to, kind, error = %e, "Email delivery failed");
                false
            }
        }
    }

    fn otp_minutes(&self) -> i64 {
        (self.config.otp_ttl_secs / 60).max(1)
    }

    pub async fn send_registration_received(&self, to: &str, business_name: &str, otp: &str) -> bool {
        let mail = templates::registration_received(business_name, otp, self.otp_minutes());
        self.deliver(to, mail, "registration_received").await
    }

    pub async fn send_verification_code(&self, to: &str, business_name: &str, otp: &str) -> bool {
        let mail = templates::verification_code(business_name, otp, self.otp_minutes());
        self.deliver(to, mail, "verification_code").await
    }

    /// `false` without sending when no approval address is configured
    pub async fn send_admin_registration_alert(
        &self,
        business_name: &str,
        email: &str,
        phone: &str,
    ) -> bool {
        let Some(admin_email) = self.config.mail_approval_email.as_deref() else {
            tracing::debug!("No approval email configured, skipping registration alert");
            return false;
        };
        let mail = templates::admin_registration_alert(
            business_name,
            email,
            phone,
            &self.config.approval_panel_url,
        );
        self.deliver(admin_email, mail, "admin_registration_alert").await
    }

    pub async fn send_registration_decision(
        &self,
        to: &str,
        business_name: &str,
        decision: Decision,
        template: EmailTemplate,
        menu_slug: &str,
    ) -> bool {
        let menu_url = self.config.menu_url(menu_slug);
        let links = Links {
            login_url: &self.config.dashboard_login_url,
            menu_url: &menu_url,
            support_email: &self.config.mail_support_email,
        };
        let mail = templates::registration_decision(business_name, decision, template, links);
        self.deliver(to, mail, "registration_decision").await
    }

    pub async fn send_menu_access_changed(
        &self,
        to: &str,
        business_name: &str,
        menu_enabled: bool,
        template: EmailTemplate,
        menu_slug: &str,
    ) -> bool {
        let menu_url = self.config.menu_url(menu_slug);
        let mail = templates::menu_access_changed(business_name, menu_enabled, template, &menu_url);
        self.deliver(to, mail, "menu_access_changed").await
    }

    pub async fn send_password_reset(&self, to: &str, business_name: &str, otp: &str) -> bool {
        let mail = templates::password_reset(business_name, otp, self.otp_minutes());
        self.deliver(to, mail, "password_reset").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    /// Records every message it is given
    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<(String, Mail)>>,
    }

    #[async_trait]
    impl MailTransport for Outbox {
        async fn send(&self, to: &str, mail: &Mail) -> Result<(), BoxError> {
            self.sent.lock().await.push((to.to_string(), mail.clone()));
            Ok(())
        }
    }

    fn config() -> Arc<Config> {
        Arc::new(Config::for_tests())
    }

    #[tokio::test]
    async fn test_disabled_transport_reports_failure() {
        let service = EmailService::disabled(config());
        assert!(!service.send_password_reset("o@cafe.com", "Cafe", "123456").await);
    }

    #[tokio::test]
    async fn test_decision_uses_configured_links() {
        let outbox = Arc::new(Outbox::default());
        let service = EmailService::new(outbox.clone(), config());

        let sent = service
            .send_registration_decision(
                "o@cafe.com",
                "Cafe",
                Decision::Approved,
                EmailTemplate::En,
                "cafe",
            )
            .await;
        assert!(sent);

        let sent = outbox.sent.lock().await;
        let (to, mail) = &sent[0];
        assert_eq!(to, "o@cafe.com");
        assert!(mail.body.contains("http://menu.test/Menu/cafe"));
        assert!(mail.body.contains("http://panel.test/login"));
    }

    #[tokio::test]
    async fn test_admin_alert_goes_to_approval_address() {
        let outbox = Arc::new(Outbox::default());
        let service = EmailService::new(outbox.clone(), config());
        assert!(
            service
                .send_admin_registration_alert("Cafe", "o@cafe.com", "+1")
                .await
        );
        assert_eq!(outbox.sent.lock().await[0].0, "approvals@storemenu.test");
    }

    #[tokio::test]
    async fn test_admin_alert_skipped_without_recipient() {
        let outbox = Arc::new(Outbox::default());
        let mut config = Config::for_tests();
        config.mail_approval_email = None;
        let service = EmailService::new(outbox.clone(), Arc::new(config));
        assert!(
            !service
                .send_admin_registration_alert("Cafe", "o@cafe.com", "+1")
                .await
        );
        assert!(outbox.sent.lock().await.is_empty());
    }
}
