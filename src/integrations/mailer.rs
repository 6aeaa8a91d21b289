// src/integrations/mailer.rs

// Reset-password mail through the Resend API. Delivery failure is logged and
// swallowed by the caller: the forgot-password endpoint always answers ok to
// avoid account enumeration.

use serde_json::json;

const RESEND_URL: &str = "https://api.resend.com/emails";
const FROM_ADDRESS: &str = "Kost Annisa <noreply@kostannisa.app>";

#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
}

impl Mailer {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn send_reset_password(
        &self,
        api_key: &str,
        to: &str,
        reset_link: &str,
        name: Option<&str>,
    ) -> anyhow::Result<()> {
        let greeting = name.unwrap_or("Admin");
        let html = format!(
            "<p>Halo {greeting},</p>\
             <p>Kami menerima permintaan reset password untuk akun Anda. \
             Klik tautan di bawah untuk mengatur password baru (berlaku 15 menit):</p>\
             <p><a href=\"{reset_link}\">Reset Password</a></p>\
             <p>Abaikan email ini jika Anda tidak meminta reset.</p>"
        );

        let res = self
            .http
            .post(RESEND_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "from": FROM_ADDRESS,
                "to": [to],
                "subject": "Reset Password - Kost Annisa",
                "html": html,
            }))
            .send()
            .await?;
        if !res.status().is_success() {
            anyhow::bail!("Resend error {}: {}", res.status(), res.text().await?);
        }
        Ok(())
    }
}
