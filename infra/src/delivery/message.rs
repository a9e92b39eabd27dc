//! Text of the verification messages sent to users

/// Renders the subject and bodies carrying a one-time code
#[derive(Debug, Clone)]
pub struct CodeMessage {
    app_name: String,
    ttl_minutes: i64,
}

impl CodeMessage {
    pub fn new(app_name: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            app_name: app_name.into(),
            ttl_minutes,
        }
    }

    pub fn subject(&self) -> String {
        format!("Your {} verification code", self.app_name)
    }

    pub fn html(&self, code: &str) -> String {
        format!(
            "<h2>{} verification</h2><h1>{}</h1><p>This code expires in {} minutes. \
             If you did not request it, you can ignore this email.</p>",
            self.app_name, code, self.ttl_minutes
        )
    }

    pub fn sms_text(&self, code: &str) -> String {
        format!(
            "Your {} verification code is {}. It expires in {} minutes.",
            self.app_name, code, self.ttl_minutes
        )
    }
}

impl Default for CodeMessage {
    fn default() -> Self {
        Self::new("CraftConnect", 10)
    }
}
