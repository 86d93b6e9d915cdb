//! Payment provider configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Bearer access token for the provider API
    pub access_token: String,

    /// Base URL for the provider API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Where the provider sends customers after checkout
    #[serde(default = "default_back_url")]
    pub back_url: String,
}

impl PaymentConfig {
    /// Check if using a provider test credential
    pub fn is_test_mode(&self) -> bool {
        self.access_token.starts_with("TEST-")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.access_token.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_ACCESS_TOKEN"));
        }
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if !self.back_url.starts_with("https://") && !self.back_url.starts_with("http://") {
            return Err(ValidationError::InvalidBackUrl);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base_url: default_api_base_url(),
            back_url: default_back_url(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.mercadopago.com".to_string()
}

fn default_back_url() -> String {
    "http://localhost:5173/membership".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_follows_token_prefix() {
        let config = PaymentConfig {
            access_token: "TEST-abc".to_string(),
            ..Default::default()
        };
        assert!(config.is_test_mode());

        let config = PaymentConfig {
            access_token: "APP_USR-abc".to_string(),
            ..Default::default()
        };
        assert!(!config.is_test_mode());
    }

    #[test]
    fn validation_requires_an_access_token() {
        let config = PaymentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_non_http_urls() {
        let config = PaymentConfig {
            access_token: "TEST-abc".to_string(),
            api_base_url: "ftp://api.example".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_accepts_the_defaults_with_a_token() {
        let config = PaymentConfig {
            access_token: "TEST-abc".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
