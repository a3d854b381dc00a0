use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::SmtpConfig;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_otp_email(
        &self,
        to_email: &str,
        name: &str,
        otp_code: &str,
        ttl_minutes: i64,
    ) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from_email: String,
}

impl EmailService {
    /// Authenticated STARTTLS relay when a username is configured, plain SMTP
    /// to a local relay otherwise.
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let mailer = if config.username.is_empty() {
            SmtpTransport::builder_dangerous(&config.host)
                .port(config.port)
                .timeout(Some(Duration::from_secs(10)))
                .build()
        } else {
            let creds = Credentials::new(
                config.username.clone(),
                config.password.expose_secret().clone(),
            );
            SmtpTransport::starttls_relay(&config.host)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?
                .credentials(creds)
                .port(config.port)
                .timeout(Some(Duration::from_secs(10)))
                .build()
        };

        tracing::info!(host = %config.host, port = config.port, "Email service initialized");

        Ok(Self {
            mailer,
            from_email: config.from.clone(),
        })
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        plain_body: String,
        html_body: String,
    ) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e: lettre::address::AddressError| AppError::ConfigError(e.into()))?,
            )
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| AppError::EmailError(e.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        // SmtpTransport is blocking.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::InternalError(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, subject = %subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, to = %to_email, "Failed to send email");
                Err(AppError::EmailError(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl EmailProvider for EmailService {
    async fn send_otp_email(
        &self,
        to_email: &str,
        name: &str,
        otp_code: &str,
        ttl_minutes: i64,
    ) -> Result<(), AppError> {
        let html_body = format!(
            r#"<html>
    <body style="font-family: Arial, sans-serif;">
        <h2>Hi {name}, verify your account</h2>
        <p>Use this code to activate your booking account:</p>
        <p style="font-size: 28px; letter-spacing: 6px;"><strong>{otp_code}</strong></p>
        <p style="color: #666; font-size: 12px;">
            The code expires in {ttl_minutes} minutes. If you did not sign up, ignore this email.
        </p>
    </body>
</html>"#
        );

        let plain_body = format!(
            "Hi {name},\n\nYour verification code is {otp_code}.\n\n\
             The code expires in {ttl_minutes} minutes. If you did not sign up, ignore this email."
        );

        self.send_email(to_email, "Your verification code", plain_body, html_body)
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentOtp {
    pub to_email: String,
    pub otp_code: String,
}

/// In-memory mailer. Records every code it is asked to send; a failing
/// instance refuses every message.
#[derive(Clone, Default)]
pub struct MockEmailService {
    sent: Arc<Mutex<Vec<SentOtp>>>,
    fail: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentOtp> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Most recent code sent to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|m| m.to_email.eq_ignore_ascii_case(email))
            .map(|m| m.otp_code)
    }
}

#[async_trait]
impl EmailProvider for MockEmailService {
    async fn send_otp_email(
        &self,
        to_email: &str,
        _name: &str,
        otp_code: &str,
        _ttl_minutes: i64,
    ) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::EmailError("mock mailer is offline".to_string()));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentOtp {
                to_email: to_email.to_string(),
                otp_code: otp_code.to_string(),
            });
        }
        tracing::debug!(to = %to_email, "Mock OTP email recorded");
        Ok(())
    }
}
