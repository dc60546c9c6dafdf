use payments::ecpay_client::{EcpayConfig, EncryptType};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub ecpay: Ecpay,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Ecpay {
    pub merchant_id: String,
    pub hash_key: String,
    pub hash_iv: String,
    pub payment_url: String,
    pub return_url: String,
    pub client_back_url: String,
    pub encrypt_type: String,
}

impl Ecpay {
    pub fn to_client_config(&self) -> EcpayConfig {
        let encrypt_type = match self.encrypt_type.trim() {
            "0" | "md5" => EncryptType::Md5,
            _ => EncryptType::Sha256,
        };

        EcpayConfig {
            merchant_id: self.merchant_id.clone(),
            hash_key: self.hash_key.clone(),
            hash_iv: self.hash_iv.clone(),
            payment_url: self.payment_url.clone(),
            return_url: self.return_url.clone(),
            client_back_url: self.client_back_url.clone(),
            encrypt_type,
        }
    }
}
